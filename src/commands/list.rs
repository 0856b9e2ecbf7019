//! List site content

use anyhow::Result;

use crate::content::ContentKind;
use crate::Site;

/// List the documents of one content kind
pub async fn run(site: &Site, content_type: &str) -> Result<()> {
    let kind: ContentKind = content_type.parse().map_err(|_| {
        anyhow::anyhow!(
            "Unknown type: {}. Available: posts, case-studies, services",
            content_type
        )
    })?;
    let queries = site.queries();

    match kind {
        ContentKind::Post => {
            let posts = queries.list_posts().await?;
            println!("Posts ({}):", posts.len());
            for post in posts {
                println!(
                    "  {} - {} [{}] {} min",
                    post.published_at.format("%Y-%m-%d"),
                    post.title,
                    post.slug,
                    post.read_time
                );
            }
        }
        ContentKind::CaseStudy => {
            let studies = queries.list_case_studies().await?;
            println!("Case studies ({}):", studies.len());
            for study in studies {
                println!(
                    "  {} - {} for {} [{}]",
                    study.published_at.format("%Y-%m-%d"),
                    study.title,
                    study.client,
                    study.slug
                );
            }
        }
        ContentKind::Service => {
            let services = queries.list_services().await?;
            println!("Services ({}):", services.len());
            for service in services {
                println!(
                    "  {} [{}] {} features",
                    service.title,
                    service.slug,
                    service.features.len()
                );
            }
        }
    }

    Ok(())
}
