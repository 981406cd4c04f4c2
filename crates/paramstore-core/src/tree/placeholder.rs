//! Placeholder syntax: `<marker><parameter name>`

/// Parameter name referenced by `value`, if it starts with `marker`
///
/// The marker is stripped exactly once from the front. There is no escape:
/// any value beginning with the marker is a placeholder.
///
/// ```
/// use paramstore_core::tree::placeholder_name;
///
/// assert_eq!(placeholder_name("ssm:/db/pass", "ssm:"), Some("/db/pass"));
/// assert_eq!(placeholder_name("ssm:ssm:/x", "ssm:"), Some("ssm:/x"));
/// assert_eq!(placeholder_name("plain", "ssm:"), None);
/// ```
pub fn placeholder_name<'a>(value: &'a str, marker: &str) -> Option<&'a str> {
    value.strip_prefix(marker)
}

pub fn is_placeholder(value: &str, marker: &str) -> bool {
    value.starts_with(marker)
}
