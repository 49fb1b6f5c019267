use serde::Serialize;

/// Declaration facts of one method, independent of where they came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MethodRecord {
    pub owner: String,
    pub modifiers: Vec<String>,
    pub type_parameters: Vec<String>,
    pub return_type: String,
    pub name: String,
    pub parameter_types: Vec<String>,
    pub thrown_types: Vec<String>,
    pub is_constructor: bool,
    pub is_static_initializer: bool,
}

/// Renders a record as a single declaration line terminated by `;`.
pub fn render(record: &MethodRecord) -> String {
    let mut tokens: Vec<String> = record.modifiers.clone();

    if record.is_static_initializer {
        tokens.push("{}".to_string());
        return format!("{};", tokens.join(" "));
    }

    if !record.type_parameters.is_empty() {
        tokens.push(format!("<{}>", record.type_parameters.join(",")));
    }

    let params = record.parameter_types.join(",");
    if record.is_constructor {
        tokens.push(format!("{}({params})", record.owner));
    } else {
        if !record.return_type.is_empty() {
            tokens.push(record.return_type.clone());
        }
        tokens.push(format!("{}({params})", record.name));
    }

    let mut line = tokens.join(" ");
    if !record.thrown_types.is_empty() {
        line.push_str(" throws ");
        line.push_str(&record.thrown_types.join(", "));
    }
    line.push(';');
    line
}
