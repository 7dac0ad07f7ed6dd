use aslookup::lens::utils::OutputFormat;
use aslookup::AslookupConfig;
use clap::Args;
use serde::Serialize;

/// Arguments for the Config command
#[derive(Args)]
pub struct ConfigArgs {
    /// Print the config file path only
    #[clap(short, long)]
    pub path: bool,
}

#[derive(Debug, Serialize)]
struct ConfigInfo<'a> {
    config_file: String,
    #[serde(flatten)]
    settings: &'a AslookupConfig,
}

pub fn run(config: &AslookupConfig, args: ConfigArgs, output_format: OutputFormat) {
    let ConfigArgs { path } = args;

    if path {
        println!("{}", AslookupConfig::config_file_path());
        return;
    }

    if output_format.is_json() {
        let info = ConfigInfo {
            config_file: AslookupConfig::config_file_path(),
            settings: config,
        };
        let output = match output_format {
            OutputFormat::JsonPretty => serde_json::to_string_pretty(&info),
            _ => serde_json::to_string(&info),
        };
        match output {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("Error serializing configuration: {}", e),
        }
    } else {
        println!("{}", config.summary());
    }
}
