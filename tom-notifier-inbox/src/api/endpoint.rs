use crate::error::Error;
use reqwest::Url;

///
/// Append path segments to the base url.
/// Every segment is percent-encoded, so opaque ids can't escape their segment
///
pub fn endpoint_url(base_url: &str, segments: &[&str]) -> Result<Url, Error> {
    let mut url = Url::parse(base_url).map_err(|err| Error::InvalidUrl(err.to_string()))?;

    url.path_segments_mut()
        .map_err(|_| Error::InvalidUrl(format!("{base_url} cannot be a base")))?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}
