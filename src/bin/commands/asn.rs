use aslookup::lens::asn::{classify, AsnLens, AsnLookupResult, ParseMode, QueryKind};
use aslookup::lens::utils::OutputFormat;
use aslookup::AslookupConfig;
use clap::Args;

/// Arguments for the As command
#[derive(Args)]
pub struct AsArgs {
    /// AS number with the "AS" prefix, e.g. "AS13335"
    #[clap(value_name = "ASN")]
    pub asn: String,

    /// Fail when the AS number or a prefix in the response is malformed
    #[clap(long)]
    pub strict: bool,
}

pub fn run(config: &AslookupConfig, args: AsArgs, format: OutputFormat) {
    let AsArgs { asn, strict } = args;

    if classify(&asn) != QueryKind::As {
        eprintln!("ERROR: '{}' is not a valid AS number, expected e.g. AS13335", asn);
        std::process::exit(1);
    }

    let mut lens = AsnLens::from_config(config);
    if strict {
        lens = lens.with_mode(ParseMode::Strict);
    }

    match lens.resolve_as(&asn) {
        Ok(record) => {
            let result = AsnLookupResult::As(record);
            println!("{}", lens.format_result(&result, &format));
        }
        Err(e) => super::exit_with_lookup_error(&asn, &e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Command;

    #[test]
    fn test_strict_help_mentions_prefix() {
        let cmd = AsArgs::augment_args(Command::new("as"));
        let strict = cmd
            .get_arguments()
            .find(|arg| arg.get_id() == "strict")
            .unwrap();
        let help = strict.get_help().unwrap().to_string();
        assert!(help.contains("AS number"));
        assert!(help.contains("prefix"));
    }
}
