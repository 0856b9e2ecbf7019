//! Print the sitemap

use anyhow::Result;

use crate::Site;

pub async fn run(site: &Site) -> Result<()> {
    let sitemap = site.sitemap(chrono::Utc::now()).await;
    print!("{}", sitemap.to_xml());
    Ok(())
}
