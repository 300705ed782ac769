use std::path::Path;
use tracing::{info, warn};
use url::Url;

use crate::error::ToasterError;

/// Fetch `url` and write the raw body to `destination`, creating parent directories.
///
/// The status code is not checked: a non-2xx body is written as well.
pub async fn download_file(
    client: &reqwest::Client,
    url: &Url,
    destination: &Path,
) -> Result<usize, ToasterError> {
    info!(url = %url, destination = %destination.display(), "downloading");
    if let Some(parent) = destination.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }

    let resp = client.get(url.clone()).send().await?;
    let status = resp.status();
    if !status.is_success() {
        // TODO: decide whether a failed fetch should abort the pipeline instead of writing the error body.
        warn!(%status, url = %url, "download returned a non-success status; writing body anyway");
    }
    let bytes = resp.bytes().await?;
    tokio::fs::write(destination, &bytes).await?;
    Ok(bytes.len())
}
