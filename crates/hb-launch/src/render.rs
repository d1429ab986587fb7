use hb_model::ApplicationConfig;

use crate::error::LaunchError;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Substitute `{{ .Field.Path }}` placeholders with values from `app`.
///
/// Recognised paths: `Name`, `UniqueId`, `Template`, `Container.Image`,
/// `Container.Arguments`, `Container.ResourceRequest.Memory|Cpu`,
/// `Container.ResourceLimit.Memory|Cpu`, `Container.UID`, `Container.GID`.
pub fn render(template: &str, app: &ApplicationConfig) -> Result<String, LaunchError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after = &rest[start + OPEN.len()..];
        let end = after.find(CLOSE).ok_or_else(|| {
            LaunchError::Render(format!(
                "unterminated placeholder near '{}'",
                snippet(&rest[start..])
            ))
        })?;

        let expr = after[..end].trim();
        let path = expr
            .strip_prefix('.')
            .ok_or_else(|| LaunchError::Render(format!("unsupported expression '{expr}'")))?;
        let value = lookup(app, path)
            .ok_or_else(|| LaunchError::Render(format!("unknown field '.{path}'")))?;

        out.push_str(value);
        rest = &after[end + CLOSE.len()..];
    }
    out.push_str(rest);
    Ok(out)
}

fn lookup<'a>(app: &'a ApplicationConfig, path: &str) -> Option<&'a str> {
    let c = &app.container;
    let value = match path {
        "Name" => &app.name,
        "UniqueId" => &app.unique_id,
        "Template" => &app.template,
        "Container.Image" => &c.image,
        "Container.Arguments" => &c.arguments,
        "Container.ResourceRequest.Memory" => &c.resource_requests.memory,
        "Container.ResourceRequest.Cpu" => &c.resource_requests.cpu,
        "Container.ResourceLimit.Memory" => &c.resource_limits.memory,
        "Container.ResourceLimit.Cpu" => &c.resource_limits.cpu,
        "Container.UID" => &c.uid,
        "Container.GID" => &c.gid,
        _ => return None,
    };
    Some(value.as_str())
}

fn snippet(s: &str) -> &str {
    let end = s.char_indices().nth(24).map_or(s.len(), |(i, _)| i);
    &s[..end]
}
