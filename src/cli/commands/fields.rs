use crate::error::Result;
use crate::format::FieldInfo;
use crate::query::LogicalField;

/// Execute the fields command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(json: bool) -> Result<()> {
    let fields = field_infos();

    if json {
        println!("{}", serde_json::to_string_pretty(&fields)?);
        return Ok(());
    }

    for line in render_text(&fields) {
        println!("{line}");
    }
    Ok(())
}

fn field_infos() -> Vec<FieldInfo> {
    LogicalField::KNOWN.iter().map(FieldInfo::from).collect()
}

fn render_text(fields: &[FieldInfo]) -> Vec<String> {
    let name_width = fields.iter().map(|info| info.name.len()).max().unwrap_or(0);
    fields
        .iter()
        .map(|info| {
            let strict = if info.strict { "  (required)" } else { "" };
            format!(
                "{:<name_width$}  empty group: {:<12}  keys: {}{strict}",
                info.name,
                info.group_label,
                info.source_keys.join(", "),
            )
        })
        .collect()
}
