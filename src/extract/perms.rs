//! Security-group row composition
//!
//! A security group owns a sequence of permission entries. For display, the
//! group's shared fields appear once and each permission gets its own row:
//! the first row carries the shared fields plus the first permission, the
//! continuation rows carry only the permission column, and a group with no
//! permissions still emits exactly one row of shared fields.

use super::error::{ExtractError, PathError, Result};
use super::extractor::RowExtractor;
use super::path::{resolve, Resolved};
use super::types::{display_string, Cell, Row};
use serde_json::Value;

/// Render each permission entry as `protocol/cidr-list:port-range`.
///
/// The universal IPv4 range `0.0.0.0/0` is rewritten to `*`, equal port
/// bounds collapse to a single number, and an entry without port
/// information (the all-traffic rule) renders as `*:*`.
pub fn format_ip_permissions(perms: &[Value]) -> std::result::Result<Vec<String>, PathError> {
    perms.iter().map(format_permission).collect()
}

fn format_permission(perm: &Value) -> std::result::Result<String, PathError> {
    let has_ports = perm
        .as_object()
        .is_some_and(|map| map.contains_key("FromPort"));
    if !has_ports {
        return Ok("*:*".to_string());
    }

    let from = resolve(perm, "FromPort")?.into_value();
    let to = resolve(perm, "ToPort")?.into_value();
    let proto = display_string(&resolve(perm, "IpProtocol")?.into_value());

    let ranges = match resolve(perm, "IpRanges.[].CidrIp")? {
        Resolved::Many(items) => items,
        Resolved::One(value) => vec![value],
    };
    let cidrs: Vec<String> = ranges
        .iter()
        .map(|range| match range {
            Value::String(cidr) if cidr == "0.0.0.0/0" => "*".to_string(),
            other => display_string(other),
        })
        .collect();

    let ports = if from == to {
        display_string(&from)
    } else {
        format!("{}-{}", display_string(&from), display_string(&to))
    };

    Ok(format!("{}/{}:{}", proto, cidrs.join(","), ports))
}

/// Expand one record into rows carrying a per-detail column.
///
/// Shared fields are extracted once onto the first row; every further detail
/// gets a row holding only the detail column, leaving the shared columns
/// absent (rendered blank by a tabular consumer). No details means one row
/// of shared fields and no detail column.
pub fn rows_with_details(
    record: &Value,
    extractor: &RowExtractor,
    column: &str,
    details: &[String],
) -> Result<Vec<Row>> {
    let Some((first, rest)) = details.split_first() else {
        return Ok(vec![extractor.extract(record)?]);
    };

    let mut header = extractor.extract(record)?;
    header.insert(column, Cell::Text(first.clone()));

    let mut rows = vec![header];
    for detail in rest {
        let mut row = Row::new();
        row.insert(column, Cell::Text(detail.clone()));
        rows.push(row);
    }
    Ok(rows)
}

/// Rows for one security group: shared fields plus one `column` entry per
/// formatted permission in the group's `IpPermissions`.
pub fn security_group_rows(
    group: &Value,
    extractor: &RowExtractor,
    column: &str,
) -> Result<Vec<Row>> {
    let perms = match resolve(group, "IpPermissions").map_err(tag_perms)?.into_value() {
        Value::Array(items) => items,
        _ => {
            return Err(tag_perms(PathError::NotASequence {
                segment: "IpPermissions".to_string(),
            }))
        }
    };
    let details = format_ip_permissions(&perms).map_err(tag_perms)?;
    rows_with_details(group, extractor, column, &details)
}

fn tag_perms(source: PathError) -> ExtractError {
    ExtractError::Resolve {
        spec: "IpPermissions".to_string(),
        path: "IpPermissions".to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_port_universal_range() {
        let perms = vec![json!({
            "FromPort": 22,
            "ToPort": 22,
            "IpProtocol": "tcp",
            "IpRanges": [{"CidrIp": "0.0.0.0/0"}]
        })];

        assert_eq!(format_ip_permissions(&perms).unwrap(), vec!["tcp/*:22"]);
    }

    #[test]
    fn test_port_range_and_private_cidr() {
        let perms = vec![json!({
            "FromPort": 1000,
            "ToPort": 2000,
            "IpProtocol": "udp",
            "IpRanges": [{"CidrIp": "10.0.0.0/8"}]
        })];

        assert_eq!(
            format_ip_permissions(&perms).unwrap(),
            vec!["udp/10.0.0.0/8:1000-2000"]
        );
    }

    #[test]
    fn test_all_traffic_rule() {
        let perms = vec![json!({"IpProtocol": "-1", "IpRanges": []})];
        assert_eq!(format_ip_permissions(&perms).unwrap(), vec!["*:*"]);
    }

    #[test]
    fn test_multiple_cidrs_join_with_comma() {
        let perms = vec![json!({
            "FromPort": 443,
            "ToPort": 443,
            "IpProtocol": "tcp",
            "IpRanges": [{"CidrIp": "0.0.0.0/0"}, {"CidrIp": "192.168.0.0/16"}]
        })];

        assert_eq!(
            format_ip_permissions(&perms).unwrap(),
            vec!["tcp/*,192.168.0.0/16:443"]
        );
    }

    #[test]
    fn test_entry_with_ports_but_no_protocol_fails() {
        let perms = vec![json!({"FromPort": 22, "ToPort": 22, "IpRanges": []})];
        assert_eq!(
            format_ip_permissions(&perms).unwrap_err(),
            PathError::KeyNotFound {
                key: "IpProtocol".into()
            }
        );
    }

    fn group(perms: Vec<Value>) -> Value {
        json!({
            "GroupName": "web-servers",
            "GroupId": "sg-0aa11bb2",
            "Description": "Frontend web tier",
            "IpPermissions": perms
        })
    }

    fn sg_extractor() -> RowExtractor {
        RowExtractor::new(&[
            "name/30:GroupName",
            "id:GroupId",
            "description/40:Description",
        ])
        .unwrap()
    }

    #[test]
    fn test_three_permissions_yield_three_rows() {
        let group = group(vec![
            json!({"FromPort": 22, "ToPort": 22, "IpProtocol": "tcp",
                   "IpRanges": [{"CidrIp": "0.0.0.0/0"}]}),
            json!({"FromPort": 80, "ToPort": 80, "IpProtocol": "tcp",
                   "IpRanges": [{"CidrIp": "0.0.0.0/0"}]}),
            json!({"IpProtocol": "-1", "IpRanges": []}),
        ]);

        let rows = security_group_rows(&group, &sg_extractor(), "ports").unwrap();
        assert_eq!(rows.len(), 3);

        // First row carries the shared fields plus the first permission.
        assert_eq!(rows[0].get("name").unwrap().to_display(), "web-servers");
        assert_eq!(rows[0].get("ports").unwrap().to_display(), "tcp/*:22");

        // Continuation rows carry only the permission column.
        assert_eq!(rows[1].len(), 1);
        assert_eq!(rows[1].get("ports").unwrap().to_display(), "tcp/*:80");
        assert!(!rows[1].contains("name"));
        assert_eq!(rows[2].get("ports").unwrap().to_display(), "*:*");
    }

    #[test]
    fn test_zero_permissions_yield_one_row() {
        let group = group(vec![]);
        let rows = security_group_rows(&group, &sg_extractor(), "ports").unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("id").unwrap().to_display(), "sg-0aa11bb2");
        assert!(!rows[0].contains("ports"));
    }

    #[test]
    fn test_missing_permission_list_is_an_error() {
        let group = json!({"GroupName": "g", "GroupId": "sg-1", "Description": "d"});
        let err = security_group_rows(&group, &sg_extractor(), "ports").unwrap_err();
        assert!(matches!(err, ExtractError::Resolve { .. }));
    }
}
