//! Class-shape emitter.
//!
//! Emits a getter/setter Java class definition from a list of observed
//! attribute names. Pure string formatting: no I/O, no validation of
//! the names (garbage in, garbage out).

/// Emits a Java class definition with one private `String` field and a
/// getter/setter pair per attribute, in input order.
///
/// An empty attribute list yields a class with no fields.
#[must_use]
pub fn generate_java_class(attributes: &[String], class_name: &str) -> String {
    let mut out = String::new();

    out.push_str("// This string is generated to create a Java class\n");
    out.push_str(&format!("public class {class_name} {{\n"));

    for attribute in attributes {
        out.push_str(&format!("    private String {attribute};\n"));
    }
    out.push('\n');

    for attribute in attributes {
        let capitalized = capitalize(attribute);

        out.push_str(&format!("    public String get{capitalized}() {{\n"));
        out.push_str(&format!("        return {attribute};\n"));
        out.push_str("    }\n\n");

        out.push_str(&format!(
            "    public void set{capitalized}(String {attribute}) {{\n"
        ));
        out.push_str(&format!("        this.{attribute} = {attribute};\n"));
        out.push_str("    }\n\n");
    }
    out.push_str("}\n");

    out.push_str("// End of the generated string to create a Java class\n");

    out
}

/// Upper-cases the first character, leaving the rest untouched.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
