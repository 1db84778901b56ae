// Rendering of retrieved material for the answer-synthesis prompt
use crate::errors::Result;
use crate::types::{Passage, ResourceRecord};

const ENTRY_SEPARATOR: &str = "\n---\n";

/// Pretty-printed JSON array of passages; empty string when there are none
pub fn passages_to_json(passages: &[Passage]) -> Result<String> {
    if passages.is_empty() {
        return Ok(String::new());
    }
    Ok(serde_json::to_string_pretty(passages)?)
}

/// Markdown digest of ranked resources
pub fn render_resources(resources: &[ResourceRecord]) -> String {
    resources
        .iter()
        .map(render_resource)
        .collect::<Vec<_>>()
        .join(ENTRY_SEPARATOR)
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}

fn render_resource(resource: &ResourceRecord) -> String {
    let ecr = &resource.ecr_metadata;

    let link_line = if resource.link.trim().is_empty() {
        "- **No direct document link available.**".to_string()
    } else {
        format!(
            "- **Read This Document Directly Here:** [{0}]({0})",
            resource.link
        )
    };

    format!(
        "\n## {title}\n\
         - **Author:** {author}\n\
         - **Description:** {description}\n\
         {link_line}\n\
         - **Type:** {kind}\n\
         - **Access Type:** {access}\n\
         \n\
         ### ECR-Specific Information:\n\
         - **Relevance Score:** {score}/5\n\
         - **Development Stage:** {stage}\n\
         - **Estimated Time:** {time}\n\
         - **Complexity Level:** {complexity}\n\
         - **Prerequisites:** {prerequisites}\n\
         - **Key Learnings:** {learnings}\n\
         - **Common Pitfalls:** {pitfalls}\n",
        title = or_placeholder(&resource.title, "Untitled"),
        author = or_placeholder(&resource.author, "Unknown"),
        description = or_placeholder(&resource.description, "No description available"),
        link_line = link_line,
        kind = or_placeholder(&resource.resource_type, "Unknown"),
        access = or_placeholder(&resource.access_type, "Unknown"),
        score = ecr.relevance_score,
        stage = ecr.development_stage,
        time = ecr.estimated_time,
        complexity = ecr.complexity_level,
        prerequisites = join_or_none(&ecr.prerequisites),
        learnings = join_or_none(&ecr.key_learnings),
        pitfalls = join_or_none(&ecr.common_pitfalls),
    )
}
