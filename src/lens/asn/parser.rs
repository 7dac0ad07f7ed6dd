//! Response parsing for the aslookup text format
//!
//! The service answers with a header line of double-quoted fields, optionally
//! followed by one bare prefix per line:
//!
//! ```text
//! "1.1.1.1","13335","1.1.1.0/24","CLOUDFLARENET - Cloudflare, Inc., US"
//! ```
//!
//! ```text
//! "13335","CLOUDFLARENET - Cloudflare, Inc., US"
//! 104.20.208.0/20
//! 172.68.148.0/22
//! ```
//!
//! Parsing is split into a quoted-field scanner for the header and a line
//! scanner for the prefix list. Field positions are fixed.

use super::types::{AsRecord, IpAsnRecord, LookupError, ParseMode, ParseWarning};
use ipnet::IpNet;
use std::net::IpAddr;
use tracing::warn;

/// Split a response into its header line and the remaining lines
///
/// The remainder starts right after the first newline and is `None` when the
/// response is a single line.
pub fn split_header(body: &str) -> (&str, Option<&str>) {
    match body.split_once('\n') {
        Some((header, rest)) => (header.trim_end_matches('\r'), Some(rest)),
        None => (body, None),
    }
}

/// Collect every substring enclosed by a pair of `"` characters, in order
///
/// Quotes do not nest and cannot be escaped. A trailing unmatched quote is
/// ignored. Empty fields (`""`) are kept so positions stay stable.
pub fn quoted_fields(line: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = line.split('"').collect();
    // an even number of segments means the last quote is unterminated
    if segments.len() % 2 == 0 {
        segments.pop();
    }
    segments.into_iter().skip(1).step_by(2).collect()
}

/// One prefix per non-empty line, trimmed, in response order
pub fn cidr_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn field<'a>(
    fields: &[&'a str],
    index: usize,
    name: &'static str,
) -> Result<&'a str, LookupError> {
    fields
        .get(index)
        .copied()
        .ok_or(LookupError::MissingField { index, name })
}

/// Handle a soft error according to the parse mode
fn soften(
    warnings: &mut Vec<ParseWarning>,
    warning: ParseWarning,
    mode: ParseMode,
) -> Result<(), LookupError> {
    match mode {
        ParseMode::Strict => Err(LookupError::MalformedField(warning)),
        ParseMode::Lenient => {
            warn!("{}, keeping record", warning);
            warnings.push(warning);
            Ok(())
        }
    }
}

/// Parse the answer to an IP query into `record`
///
/// Expects `"<asn>","<cidr>","<owner>"` on the header line, optionally preceded
/// by the echoed address. A non-numeric AS number becomes 0 and an invalid
/// prefix becomes `None` unless `mode` is [`ParseMode::Strict`].
pub fn parse_ip_response(
    record: &mut IpAsnRecord,
    body: &str,
    mode: ParseMode,
) -> Result<(), LookupError> {
    let (header, _) = split_header(body);
    let fields = quoted_fields(header);
    if fields.is_empty() {
        return Err(LookupError::NoData);
    }

    // skip the echoed address when present
    let offset = match fields[0].parse::<IpAddr>() {
        Ok(_) => 1,
        Err(_) => 0,
    };

    let asn_field = field(&fields, offset, "asn")?;
    let cidr_field = field(&fields, offset + 1, "cidr")?;
    let owner_field = field(&fields, offset + 2, "owner")?;

    let mut warnings = vec![];

    let asn_number = match asn_field.parse::<u32>() {
        Ok(asn) => asn,
        Err(_) => {
            soften(
                &mut warnings,
                ParseWarning::InvalidAsn(asn_field.to_string()),
                mode,
            )?;
            0
        }
    };

    let cidr_block = match cidr_field.parse::<IpNet>() {
        Ok(net) => Some(net.trunc()),
        Err(_) => {
            soften(
                &mut warnings,
                ParseWarning::InvalidCidr(cidr_field.to_string()),
                mode,
            )?;
            None
        }
    };

    record.asn_number = asn_number;
    record.cidr_block = cidr_block;
    record.owner_name = owner_field.to_string();
    record.warnings = warnings;
    Ok(())
}

/// Parse the answer to an AS query into `record`
///
/// The header's first field echoes the AS number and is ignored; the AS number
/// already stored in `record` stays authoritative. The second field is the
/// owner. All following lines form the prefix list. A line that is not a
/// network prefix is dropped with a warning unless `mode` is
/// [`ParseMode::Strict`].
pub fn parse_as_response(
    record: &mut AsRecord,
    body: &str,
    mode: ParseMode,
) -> Result<(), LookupError> {
    let (header, rest) = split_header(body);
    let fields = quoted_fields(header);
    if fields.is_empty() {
        return Err(LookupError::NoData);
    }

    let owner_field = field(&fields, 1, "owner")?;

    let mut warnings = vec![];
    let mut cidr_list = vec![];
    for line in rest.map(cidr_lines).unwrap_or_default() {
        if line.parse::<IpNet>().is_ok() {
            cidr_list.push(line);
        } else {
            soften(&mut warnings, ParseWarning::InvalidCidr(line), mode)?;
        }
    }

    record.owner_name = owner_field.to_string();
    record.cidr_list = cidr_list;
    record.warnings.extend(warnings);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLOUDFLARE: &str = "CLOUDFLARENET - Cloudflare, Inc., US";

    fn ip_record() -> IpAsnRecord {
        IpAsnRecord::new("1.1.1.1".parse().unwrap())
    }

    #[test]
    fn test_quoted_fields() {
        assert_eq!(quoted_fields(r#""a","b c","d, e""#), vec!["a", "b c", "d, e"]);
        assert_eq!(quoted_fields(r#""a","""#), vec!["a", ""]);
        assert_eq!(quoted_fields(r#""a","unterminated"#), vec!["a"]);
        assert!(quoted_fields("Error: no data").is_empty());
        assert!(quoted_fields("").is_empty());
    }

    #[test]
    fn test_split_header() {
        assert_eq!(split_header("one"), ("one", None));
        assert_eq!(split_header("one\r\ntwo\n"), ("one", Some("two\n")));
        assert_eq!(split_header("one\n"), ("one", Some("")));
    }

    #[test]
    fn test_parse_ip_response() {
        let body = format!(r#""13335","1.1.1.0/24","{}""#, CLOUDFLARE);
        let mut record = ip_record();
        parse_ip_response(&mut record, &body, ParseMode::Lenient).unwrap();

        assert_eq!(record.asn_number, 13335);
        assert_eq!(record.cidr_string(), "1.1.1.0/24");
        assert_eq!(record.owner_name, CLOUDFLARE);
        assert!(record.is_complete());
    }

    #[test]
    fn test_parse_ip_response_with_echoed_address() {
        let body = format!("\"1.1.1.1\",\"13335\",\"1.1.1.0/24\",\"{}\"\n", CLOUDFLARE);
        let mut record = ip_record();
        parse_ip_response(&mut record, &body, ParseMode::Lenient).unwrap();

        assert_eq!(record.asn_number, 13335);
        assert_eq!(record.cidr_string(), "1.1.1.0/24");
        assert_eq!(record.owner_name, CLOUDFLARE);
    }

    #[test]
    fn test_parse_ip_response_ipv6() {
        let body = r#""2606:4700:4700::1111","13335","2606:4700:4700::/48","CLOUDFLARENET""#;
        let mut record = IpAsnRecord::new("2606:4700:4700::1111".parse().unwrap());
        parse_ip_response(&mut record, body, ParseMode::Lenient).unwrap();

        assert_eq!(record.asn_number, 13335);
        assert_eq!(record.cidr_string(), "2606:4700:4700::/48");
    }

    #[test]
    fn test_parse_ip_response_truncates_host_bits() {
        let body = r#""13335","1.1.1.1/24","CLOUDFLARENET""#;
        let mut record = ip_record();
        parse_ip_response(&mut record, body, ParseMode::Lenient).unwrap();
        assert_eq!(record.cidr_string(), "1.1.1.0/24");
    }

    #[test]
    fn test_parse_ip_response_lenient_fields() {
        let body = r#""AS-SET","not-a-cidr","Some Owner""#;
        let mut record = ip_record();
        parse_ip_response(&mut record, body, ParseMode::Lenient).unwrap();

        assert_eq!(record.asn_number, 0);
        assert_eq!(record.cidr_block, None);
        assert_eq!(record.owner_name, "Some Owner");
        assert_eq!(
            record.warnings,
            vec![
                ParseWarning::InvalidAsn("AS-SET".to_string()),
                ParseWarning::InvalidCidr("not-a-cidr".to_string()),
            ]
        );
        assert!(!record.is_complete());
    }

    #[test]
    fn test_parse_ip_response_strict_fields() {
        let body = r#""13335","not-a-cidr","Some Owner""#;
        let mut record = ip_record();
        let err = parse_ip_response(&mut record, body, ParseMode::Strict).unwrap_err();
        assert!(matches!(
            err,
            LookupError::MalformedField(ParseWarning::InvalidCidr(_))
        ));
    }

    #[test]
    fn test_parse_ip_response_no_data() {
        let mut record = ip_record();
        let err =
            parse_ip_response(&mut record, "Error: no data", ParseMode::Lenient).unwrap_err();
        assert!(matches!(err, LookupError::NoData));
        assert_eq!(record, ip_record());
    }

    #[test]
    fn test_parse_ip_response_missing_field() {
        let mut record = ip_record();
        let err = parse_ip_response(&mut record, r#""13335","1.1.1.0/24""#, ParseMode::Lenient)
            .unwrap_err();
        assert!(matches!(
            err,
            LookupError::MissingField {
                index: 2,
                name: "owner"
            }
        ));
    }

    #[test]
    fn test_parse_as_response() {
        let body = format!(
            "\"13335\",\"{}\"\n104.20.208.0/20\n172.68.148.0/22\n",
            CLOUDFLARE
        );
        let mut record = AsRecord::new(13335);
        parse_as_response(&mut record, &body, ParseMode::Lenient).unwrap();

        assert_eq!(record.asn_number, 13335);
        assert_eq!(record.owner_name, CLOUDFLARE);
        assert_eq!(
            record.rendered_cidr_list(),
            "104.20.208.0/20, 172.68.148.0/22"
        );
        for cidr in &record.cidr_list {
            assert!(cidr.parse::<IpNet>().is_ok(), "{} should be a prefix", cidr);
        }
    }

    #[test]
    fn test_parse_as_response_keeps_order_and_duplicates() {
        let body = "\"64500\",\"EXAMPLE\"\r\n10.0.0.0/8\r\n\r\n192.0.2.0/24\r\n10.0.0.0/8";
        let mut record = AsRecord::new(64500);
        parse_as_response(&mut record, body, ParseMode::Lenient).unwrap();

        assert_eq!(
            record.cidr_list,
            vec!["10.0.0.0/8", "192.0.2.0/24", "10.0.0.0/8"]
        );
        assert_eq!(
            record.rendered_cidr_list(),
            "10.0.0.0/8, 192.0.2.0/24, 10.0.0.0/8"
        );
    }

    #[test]
    fn test_parse_as_response_header_only() {
        let mut record = AsRecord::new(64500);
        parse_as_response(&mut record, r#""64500","EXAMPLE""#, ParseMode::Lenient).unwrap();
        assert_eq!(record.owner_name, "EXAMPLE");
        assert!(record.cidr_list.is_empty());
        assert_eq!(record.rendered_cidr_list(), "");
    }

    #[test]
    fn test_parse_as_response_keeps_token_asn() {
        let mut record = AsRecord::new(13335);
        parse_as_response(&mut record, "\"99999\",\"OTHER\"\n", ParseMode::Lenient).unwrap();
        assert_eq!(record.asn_number, 13335);
    }

    #[test]
    fn test_parse_as_response_drops_invalid_prefix() {
        let body = "\"13335\",\"CLOUDFLARENET\"\nAPI count exceeded\n1.1.1.0/24\n";
        let mut record = AsRecord::new(13335);
        parse_as_response(&mut record, body, ParseMode::Lenient).unwrap();

        assert_eq!(record.cidr_list, vec!["1.1.1.0/24"]);
        assert_eq!(
            record.warnings,
            vec![ParseWarning::InvalidCidr("API count exceeded".to_string())]
        );
        assert!(!record.is_complete());
    }

    #[test]
    fn test_parse_as_response_strict_prefix() {
        let body = "\"13335\",\"CLOUDFLARENET\"\nAPI count exceeded\n1.1.1.0/24\n";
        let mut record = AsRecord::new(13335);
        let err = parse_as_response(&mut record, body, ParseMode::Strict).unwrap_err();
        assert!(matches!(
            err,
            LookupError::MalformedField(ParseWarning::InvalidCidr(ref line)) if line == "API count exceeded"
        ));
        assert!(record.cidr_list.is_empty());
    }

    #[test]
    fn test_parse_as_response_failures() {
        let mut record = AsRecord::new(13335);
        assert!(matches!(
            parse_as_response(&mut record, "Error: no data", ParseMode::Lenient),
            Err(LookupError::NoData)
        ));
        assert!(matches!(
            parse_as_response(&mut record, "\"13335\"\n1.1.1.0/24", ParseMode::Lenient),
            Err(LookupError::MissingField { index: 1, .. })
        ));
    }

    #[test]
    fn test_parse_is_idempotent() {
        let body = format!("\"13335\",\"{}\"\n104.20.208.0/20\n", CLOUDFLARE);
        let mut first = AsRecord::new(13335);
        let mut second = AsRecord::new(13335);
        parse_as_response(&mut first, &body, ParseMode::Lenient).unwrap();
        parse_as_response(&mut second, &body, ParseMode::Lenient).unwrap();
        assert_eq!(first, second);

        let body = format!(r#""13335","1.1.1.0/24","{}""#, CLOUDFLARE);
        let mut first = ip_record();
        let mut second = ip_record();
        parse_ip_response(&mut first, &body, ParseMode::Lenient).unwrap();
        parse_ip_response(&mut second, &body, ParseMode::Lenient).unwrap();
        assert_eq!(first, second);
    }
}
