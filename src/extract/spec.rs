//! Field specifications - the `<name>[/<maxlen>][<join>]:<path>` grammar
//!
//! A specification names one output column and the path that feeds it:
//!
//! - `id:InstanceId` - plain column
//! - `description/40:Description` - truncate past 40 characters
//! - `security[,]:SecurityGroups.[].GroupId` - join the broadcast with `,`
//! - `name` - shorthand, the token is both column name and path
//!
//! Parsed with a small hand-written parser rather than a regex full of
//! optional groups, so malformed modifiers surface as errors instead of
//! silently shifting into the column name.

use super::error::ExtractError;
use std::str::FromStr;

/// One parsed field directive. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Output column name
    pub name: String,
    /// Path expression fed to the resolver
    pub path: String,
    /// Truncate display text past this many characters (`...` appended)
    pub max_len: Option<usize>,
    /// Join a resolved sequence of strings with this separator
    pub join: Option<String>,
    raw: String,
}

impl FieldSpec {
    /// Parse one specification token.
    ///
    /// A token without a `:` is the shorthand form: the whole token is both
    /// the column name and the path, with no modifiers. Once a `:` is
    /// present the modifier grammar is enforced strictly.
    pub fn parse(input: &str) -> Result<FieldSpec, ExtractError> {
        if input.is_empty() {
            return Err(ExtractError::malformed(input, "empty specification"));
        }

        if !input.contains(':') {
            return Ok(FieldSpec {
                name: input.to_string(),
                path: input.to_string(),
                max_len: None,
                join: None,
                raw: input.to_string(),
            });
        }

        // Column name runs up to the first modifier or the colon.
        let name_end = input
            .find(|c| matches!(c, '/' | '[' | ':'))
            .unwrap_or(input.len());
        let name = &input[..name_end];
        let mut rest = &input[name_end..];

        let mut max_len = None;
        if let Some(after) = rest.strip_prefix('/') {
            let digits_end = after
                .find(|c| matches!(c, '[' | ':'))
                .ok_or_else(|| ExtractError::malformed(input, "missing path after modifier"))?;
            let digits = &after[..digits_end];
            let parsed: usize = digits
                .parse()
                .map_err(|_| ExtractError::malformed(input, "maxlen is not an integer"))?;
            if parsed == 0 {
                return Err(ExtractError::malformed(input, "maxlen must be positive"));
            }
            max_len = Some(parsed);
            rest = &after[digits_end..];
        }

        let mut join = None;
        if let Some(after) = rest.strip_prefix('[') {
            let close = after
                .find(']')
                .ok_or_else(|| ExtractError::malformed(input, "unterminated join separator"))?;
            join = Some(after[..close].to_string());
            rest = &after[close + 1..];
        }

        let path = rest
            .strip_prefix(':')
            .ok_or_else(|| ExtractError::malformed(input, "expected ':' before the path"))?;
        if path.is_empty() {
            return Err(ExtractError::malformed(input, "empty path"));
        }

        Ok(FieldSpec {
            name: name.to_string(),
            path: path.to_string(),
            max_len,
            join,
            raw: input.to_string(),
        })
    }

    /// The original specification token, for error messages
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl FromStr for FieldSpec {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldSpec::parse(s)
    }
}

/// Parse a whitespace-separated list of specification tokens, in order.
///
/// This is the shape both command lines and built-in default field lists
/// arrive in, e.g. `"id:InstanceId type:InstanceType ip:PublicIpAddress?"`.
pub fn parse_specs(input: &str) -> Result<Vec<FieldSpec>, ExtractError> {
    input.split_whitespace().map(FieldSpec::parse).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorthand_token() {
        let spec = FieldSpec::parse("name").unwrap();
        assert_eq!(spec.name, "name");
        assert_eq!(spec.path, "name");
        assert_eq!(spec.max_len, None);
        assert_eq!(spec.join, None);
    }

    #[test]
    fn test_name_and_path() {
        let spec = FieldSpec::parse("az:Placement.AvailabilityZone").unwrap();
        assert_eq!(spec.name, "az");
        assert_eq!(spec.path, "Placement.AvailabilityZone");
    }

    #[test]
    fn test_maxlen_modifier() {
        let spec = FieldSpec::parse("description/40:Description").unwrap();
        assert_eq!(spec.name, "description");
        assert_eq!(spec.max_len, Some(40));
        assert_eq!(spec.path, "Description");
    }

    #[test]
    fn test_join_modifier() {
        let spec = FieldSpec::parse("security[,]:SecurityGroups.[].GroupId").unwrap();
        assert_eq!(spec.name, "security");
        assert_eq!(spec.join.as_deref(), Some(","));
        assert_eq!(spec.path, "SecurityGroups.[].GroupId");
    }

    #[test]
    fn test_maxlen_and_join_together() {
        let spec = FieldSpec::parse("groups/20[/]:SecurityGroups.[].GroupName").unwrap();
        assert_eq!(spec.name, "groups");
        assert_eq!(spec.max_len, Some(20));
        assert_eq!(spec.join.as_deref(), Some("/"));
        assert_eq!(spec.path, "SecurityGroups.[].GroupName");
    }

    #[test]
    fn test_join_separator_may_contain_colon() {
        let spec = FieldSpec::parse("pair[:]:Tags.[].Key").unwrap();
        assert_eq!(spec.join.as_deref(), Some(":"));
        assert_eq!(spec.path, "Tags.[].Key");
    }

    #[test]
    fn test_path_may_contain_brackets() {
        // The name scan stops at the colon before it ever sees the path.
        let spec = FieldSpec::parse("first:Reservations.[].Instances.[0]").unwrap();
        assert_eq!(spec.name, "first");
        assert_eq!(spec.path, "Reservations.[].Instances.[0]");
    }

    #[test]
    fn test_non_integer_maxlen_is_malformed() {
        let err = FieldSpec::parse("name/abc:path").unwrap_err();
        assert!(matches!(err, ExtractError::MalformedSpecification { .. }));
    }

    #[test]
    fn test_zero_maxlen_is_malformed() {
        let err = FieldSpec::parse("name/0:path").unwrap_err();
        assert!(matches!(err, ExtractError::MalformedSpecification { .. }));
    }

    #[test]
    fn test_empty_path_is_malformed() {
        let err = FieldSpec::parse("name/30:").unwrap_err();
        assert!(matches!(err, ExtractError::MalformedSpecification { .. }));
    }

    #[test]
    fn test_unterminated_join_is_malformed() {
        let err = FieldSpec::parse("name[,:path").unwrap_err();
        assert!(matches!(err, ExtractError::MalformedSpecification { .. }));
    }

    #[test]
    fn test_leftover_between_modifiers_and_colon_is_malformed() {
        let err = FieldSpec::parse("name[,]x:path").unwrap_err();
        assert!(matches!(err, ExtractError::MalformedSpecification { .. }));
    }

    #[test]
    fn test_token_with_modifiers_but_no_colon_is_shorthand() {
        // Matches the historical fallback: without a colon the whole token
        // is a literal column, slash and all.
        let spec = FieldSpec::parse("name/30").unwrap();
        assert_eq!(spec.name, "name/30");
        assert_eq!(spec.path, "name/30");
        assert_eq!(spec.max_len, None);
    }

    #[test]
    fn test_parse_specs_splits_on_whitespace() {
        let specs = parse_specs(
            "id:InstanceId\n  type:InstanceType\n  security[,]:SecurityGroups.[].GroupId",
        )
        .unwrap();
        assert_eq!(specs.len(), 3);
        assert_eq!(specs[0].name, "id");
        assert_eq!(specs[2].join.as_deref(), Some(","));
    }

    #[test]
    fn test_parse_specs_propagates_first_error() {
        assert!(parse_specs("id:InstanceId bad/x:path").is_err());
    }
}
