use url::Url;

/// Prefix of the file name used when no explicit output name is given
const DEFAULT_NAME_PREFIX: &str = "broszura_";

/// Host plus explicit port of a URL, the unit used for "same domain" checks.
///
/// Returns an empty string for URLs without a host (`mailto:`, `javascript:` ...).
pub fn netloc(url: &Url) -> String {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    }
}

/// Derive the default output file name from a target URL.
///
/// `https://www.example.com` becomes `broszura_www_example_com`. A port is
/// kept but its colon is replaced so the name stays a valid file name.
pub fn default_output_name(url: &str) -> String {
    let location = Url::parse(url).map(|u| netloc(&u)).unwrap_or_default();
    let name = location.replace(['.', ':'], "_");
    format!("{}{}", DEFAULT_NAME_PREFIX, name)
}
