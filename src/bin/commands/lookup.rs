use aslookup::lens::asn::{AsnLens, AsnLookupArgs};
use aslookup::lens::utils::OutputFormat;
use aslookup::AslookupConfig;
use clap::Args;

/// Arguments for the Lookup command
#[derive(Args)]
pub struct LookupArgs {
    #[clap(flatten)]
    pub lookup: AsnLookupArgs,
}

pub fn run(config: &AslookupConfig, args: LookupArgs, format: OutputFormat) {
    let LookupArgs { lookup } = args;
    let lookup = AsnLookupArgs::new(&lookup.query).with_strict(lookup.strict);

    if let Err(e) = lookup.validate() {
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    }

    let lens = AsnLens::from_config(config);
    match lens.lookup(&lookup) {
        Ok(result) => println!("{}", lens.format_result(&result, &format)),
        Err(e) => super::exit_with_lookup_error(&lookup.query, &e),
    }
}
