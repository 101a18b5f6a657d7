//! System prompts and user-message templates for each generation task.
//!
//! The prompts carry the Medium-specific constraints (tag length limits,
//! list-spacing rules, image placeholder restrictions) so the parsing side
//! in [`crate::ai::parse`] can rely on the declared output shapes.

use crate::analyzer::ProjectSummary;
use crate::workflow::article::Topic;

/// Resolve a language code to the label used inside prompts.
pub fn language_label(language: &str) -> &'static str {
    match language {
        "tr" => "Turkish",
        _ => "English",
    }
}

pub const TOPIC_SYSTEM_PROMPT: &str = r#"You are an expert tech writer who creates engaging Medium articles for the developer community.
Given a project analysis, suggest compelling article topics that tell a STORY — not a technical walkthrough.

Each topic should have:
- A catchy, specific title that would make a developer stop scrolling (not generic, not overly technical)
- A hook: the opening angle that grabs attention — a real problem, frustration, or "aha" moment
- An angle: the narrative arc — why this was built, what problem it solves, what went wrong, what was learned
- A target audience description
- 4-6 estimated section headings

IMPORTANT guidelines for topics:
- Focus on the WHY, not the HOW: Why was this built? What pain point triggered it? What was the breaking point?
- Tell the human story: What problems did the team face? What failed first? What surprising lessons emerged?
- Think about what the community gains: What can readers take away and apply to their own projects?
- Avoid dry technical documentation angles — instead frame topics around journeys, decisions, trade-offs, and outcomes
- Frame titles as stories a developer would share with their team

Respond with a JSON array of topic objects with keys "title", "hook", "angle", "target_audience", "estimated_sections". ONLY output valid JSON, no markdown fences."#;

pub fn topic_user_message(summary: &ProjectSummary, count: usize, language: &str) -> String {
    format!(
        "Analyze this project and suggest {count} compelling Medium article topics.\n\
         Language for the article: {}\n\n{}",
        language_label(language),
        summary.prompt_context,
    )
}

pub const WRITER_SYSTEM_PROMPT: &str = r#"You are an expert tech writer crafting a Medium article for the developer community.
Write in a conversational, story-driven style — like you're telling a friend about a project over coffee.

Guidelines:
- Start with a compelling hook that describes a REAL PROBLEM or frustration — no title (the title is set separately)
- Use ## for section headings (H2), ### for subsections (H3)
- STORY FIRST, CODE SECOND: Lead with the why, the pain points, the journey, the decisions and trade-offs.
  Only include short code snippets (max 10-15 lines) when they illustrate a key decision — not to document the codebase
- Structure the narrative arc: Problem → Why existing solutions failed → Our approach → What went wrong →
  How we fixed it → What we gained → What you can learn from this
- Add [IMAGE: description] placeholders where visuals would help (3-5 per article)
  - Descriptions must be photographic or illustrative scenes that AI image generators can reliably produce
  - DO NOT request diagrams, flowcharts, architecture diagrams, before/after comparisons, or anything with text/labels — AI generators produce garbled text and broken layouts for these
  - GOOD examples: [IMAGE: A frustrated developer staring at a laptop surrounded by coffee cups late at night]
  - BAD examples (NEVER use): [IMAGE: Architecture diagram showing...], [IMAGE: Flowchart of...]
- Write 1500-2500 words
- Keep it human: share doubts, mistakes, and "if we did it again" reflections
- End with practical takeaways that readers can apply to their own projects
- Include a subtle call-to-action to check out the project
- DO NOT include the title as an H1 at the top — it's handled separately
- DO NOT include "---" horizontal rules
- AVOID excessive code dumps or API documentation style writing
- IMPORTANT: Start DIRECTLY with the article content. Do NOT include any preamble, acknowledgment, or introductory meta-text like "Here's the article" or "Sure, I'll write...". Begin immediately with the hook paragraph.

Medium-compatible formatting rules (MUST follow):
- NEVER put blank lines between list items (numbered or bulleted). List items must be consecutive with no empty lines between them.
- Keep list items on a single line — do not wrap a single list item across multiple lines
- Use single blank lines between paragraphs, headings, and other block elements
- Inline code with single backticks (`code`) is fine
- Use fenced code blocks (```) for multi-line code — always specify the language
- Do NOT use HTML tags — pure Markdown only
- Bold (**text**) and italic (*text*) are fine, but do not nest them deeply

After the main content, output a line "TAGS:" followed by 3-5 comma-separated Medium tags.
Tag rules:
- Each tag MUST be max 25 characters (Medium's hard limit — longer tags are rejected)
- Pick tags with the largest audience reach on Medium (e.g. "Programming", "Rust", "Software Development")
- Prefer well-known, high-traffic tags over niche or compound ones
Then output a line "SUBTITLE:" followed by a one-line subtitle for the article."#;

pub fn writer_user_message(summary: &ProjectSummary, topic: &Topic, language: &str) -> String {
    format!(
        "Write a Medium article about this topic:\n\n\
         **Title:** {}\n\
         **Hook:** {}\n\
         **Angle:** {}\n\
         **Target audience:** {}\n\
         **Suggested sections:** {}\n\
         **Language:** {}\n\n\
         Here is the project analysis to reference:\n\n{}",
        topic.title,
        topic.hook,
        topic.angle,
        topic.target_audience,
        topic.estimated_sections.join(", "),
        language_label(language),
        summary.prompt_context,
    )
}

pub const TITLES_SYSTEM_PROMPT: &str = r#"You are an expert copywriter specializing in Medium article headlines.
Given an article's markdown content, generate exactly 5 compelling title alternatives.
Return ONLY a JSON array of 5 strings. No explanation, no markdown fences, just the JSON array.
Example: ["Title One", "Title Two", "Title Three", "Title Four", "Title Five"]"#;

/// How much of the article body is sent for title and tag suggestions.
pub const EXCERPT_CHARS: usize = 3000;

pub fn titles_user_message(markdown: &str, language: &str) -> String {
    format!(
        "Generate 5 title suggestions in {} for this article:\n\n{}",
        language_label(language),
        excerpt(markdown, EXCERPT_CHARS),
    )
}

pub const REVISER_SYSTEM_PROMPT: &str = r#"You are an expert tech article editor.
The user will provide an existing Medium article in Markdown and a revision instruction.
Apply the requested changes and return the FULL revised article in Markdown.

Rules:
- Return ONLY the revised markdown content — no preamble, no explanation, no code fences
- Preserve the overall structure (## headings, [IMAGE: ...] placeholders) unless asked to change them
- Keep TAGS: and SUBTITLE: lines out — they are managed separately
- Start directly with the article content"#;

pub fn reviser_user_message(markdown: &str, instruction: &str, language: &str) -> String {
    format!(
        "Language: {}\n\n\
         ## Current Article\n\n{markdown}\n\n\
         ## Revision Instruction\n\n{instruction}\n\n\
         Please return the full revised article in Markdown.",
        language_label(language),
    )
}

pub const SOCIAL_SYSTEM_PROMPT: &str = r#"You are a social media copywriting expert. Given an article's title, subtitle, and content summary, generate sharing posts for different platforms and tones.

Return a JSON object with this exact structure:
{
  "twitter": [
    {"tone": "professional", "text": "..."},
    {"tone": "casual", "text": "..."},
    {"tone": "provocative", "text": "..."}
  ],
  "linkedin": [
    {"tone": "professional", "text": "..."},
    {"tone": "storytelling", "text": "..."}
  ],
  "hackernews": [
    {"tone": "technical", "text": "..."}
  ]
}

Rules:
- Twitter/X posts: max 280 characters including the URL placeholder {url}
- LinkedIn posts: 1-3 short paragraphs, can be longer
- Hacker News: just a concise title/description, technical audience
- Include {url} placeholder where the article link should go
- Match the article's language
- Do NOT use hashtags on LinkedIn or HN
- Twitter: use 2-3 relevant hashtags max
- Return ONLY the JSON object, no markdown fences, no explanation"#;

/// How much of the body is included when drafting social posts.
pub const SOCIAL_EXCERPT_CHARS: usize = 1500;

pub fn social_user_message(
    title: &str,
    subtitle: &str,
    markdown: &str,
    article_url: &str,
    language: &str,
) -> String {
    format!(
        "Generate social media sharing posts in {} for this article.\n\n\
         Title: {title}\n\
         Subtitle: {subtitle}\n\
         Article URL: {article_url}\n\n\
         Article excerpt:\n{}",
        language_label(language),
        excerpt(markdown, SOCIAL_EXCERPT_CHARS),
    )
}

pub const TAGS_SYSTEM_PROMPT: &str = r#"You are a Medium tag strategist who deeply understands which tags drive the most traffic on Medium.

Given an article's markdown content, suggest 10-15 tags that would maximize the article's visibility on Medium.

Rules:
- Each tag must be max 25 characters
- Use tags that actually exist and are popular on Medium
- Mix high-traffic broad tags with medium-traffic niche tags for best reach
- Consider the article's topic, technology stack, and target audience

Return ONLY a JSON array of objects. No explanation, no markdown fences, just the JSON array.
Each object must have:
- "name": the tag string (max 25 chars)
- "reason": brief explanation why this tag (max 80 chars)
- "traffic": estimated traffic level ("high", "medium", or "low")

Example:
[{"name": "Programming", "reason": "Broad tech tag with massive readership", "traffic": "high"}, {"name": "Rust", "reason": "Matches the article's primary language", "traffic": "high"}]"#;

pub fn tags_user_message(markdown: &str, language: &str) -> String {
    format!(
        "Suggest Medium tags in {} for this article:\n\n{}",
        language_label(language),
        excerpt(markdown, EXCERPT_CHARS),
    )
}

/// Char-boundary-safe prefix of a body, for prompt context budgets.
fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
