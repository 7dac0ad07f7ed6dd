pub mod asn;
pub mod config;
pub mod ip;
pub mod lookup;

use aslookup::LookupError;

/// Print a lookup failure and exit
///
/// Unknown identifiers get a short not-found message; other errors are shown
/// as-is.
pub(crate) fn exit_with_lookup_error(query: &str, err: &LookupError) -> ! {
    if err.is_not_found() {
        eprintln!("No ASN information found for '{}'", query);
    } else {
        eprintln!("ERROR: {}", err);
    }
    std::process::exit(1);
}
