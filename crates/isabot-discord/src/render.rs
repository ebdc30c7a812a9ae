// ABOUTME: Presentation layer: turns query results, videos and prompts into embeds and text.
// ABOUTME: EmbedSpec is transport-neutral; discord.rs converts it into serenity builders.

use crate::prompt::Prompt;
use crate::youtube::{self, VideoInfo};
use isabot_directory::{Introduction, QueryResult};

pub const BLURPLE: u32 = 0x5865F2;
pub const GOLD: u32 = 0xF1C40F;
pub const DARK_PURPLE: u32 = 0x71368A;
pub const BLUE: u32 = 0x3498DB;
pub const GREEN: u32 = 0x2ECC71;
pub const BRAND_GREEN: u32 = 0x57F287;
pub const BRAND_RED: u32 = 0xED4245;

/// Discord rejects embeds beyond these sizes.
const MAX_FIELDS: usize = 25;
const MAX_FIELD_NAME: usize = 256;
const MAX_FIELD_VALUE: usize = 1024;
const MAX_DESCRIPTION: usize = 4096;

pub const TIME_PARSE_FAILURE: &str = "I could not process that time string.";

const HELP_TEXT: &str = r#"
`!help`
Show this message.

`!showinfo username`
Show the information for the given user, taken from the introductions channel.

`!searchuser filters...`
Search the introductions for users which match the given filters. Examples:
`!searchuser name=alice & roles=VA`
`!searchuser roles=writer & genres=fantasy, slice-of-life` (will show writers tagged with fantasy OR slice-of-life)
`!searchuser links=?` (will show users who filled in any links)

`!genprompt`
Randomly generate a script prompt.

`!most-recent-video handle` or `!mrv handle`
Display information for the most recent video uploaded by the YouTube account with the given handle.
`!most-recent-video Alice` will show information for the channel youtube.com/@Alice

`!video-info videoID`
Display information for the given video.
`!video-info ABCXYZ` will show information for `https://youtube.com/watch?v=ABCXYZ`

`!timestamp time` or `!ts time`
Turn a time like `next friday 8pm` into a timestamp everyone sees in their own timezone.

`!timezone time in offsets` or `!tz time in offsets`
Show a time at fixed UTC offsets, e.g. `!tz 3pm in UTC+2 -05:00`.
"#;

/// Transport-neutral embed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedSpec {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub image: Option<String>,
    pub colour: u32,
    /// (name, value) pairs, rendered one per line.
    pub fields: Vec<(String, String)>,
}

impl EmbedSpec {
    pub fn new(colour: u32) -> Self {
        Self {
            colour,
            ..Self::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(truncate(&description.into(), MAX_DESCRIPTION));
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Add a field. Empty values become "-" and extra fields are dropped.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if self.fields.len() < MAX_FIELDS {
            let value = value.into();
            let value = if value.trim().is_empty() {
                "-".to_string()
            } else {
                truncate(&value, MAX_FIELD_VALUE)
            };
            self.fields
                .push((truncate(&name.into(), MAX_FIELD_NAME), value));
        }
        self
    }
}

/// Cut to at most `max` characters, marking the cut with an ellipsis.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// `!showinfo` hit.
pub fn user_info(requested: &str, introduction: &Introduction) -> EmbedSpec {
    introduction.record.iter().fold(
        EmbedSpec::new(DARK_PURPLE).title(format!("User Information: {}", requested)),
        |embed, (key, value)| embed.field(key, value),
    )
}

/// `!showinfo` miss.
pub fn user_not_found(requested: &str) -> String {
    format!("I could not find information for user '{}'", requested)
}

pub fn invalid_filter(clause: &str) -> String {
    format!(
        "I could not understand the filter `{}`. Use `key=value`, join filters with ` & `.",
        clause
    )
}

/// `!searchuser` results with the filters echoed back.
pub fn search_results(result: &QueryResult) -> EmbedSpec {
    let filter_view = if result.filters.is_empty() {
        "- (none)".to_string()
    } else {
        result
            .filters
            .clauses()
            .iter()
            .map(|clause| format!("- {}", clause))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let (results, colour) = if result.identities.is_empty() {
        (":x: None".to_string(), BRAND_RED)
    } else {
        let lines: Vec<String> = result
            .identities
            .iter()
            .map(|name| format!("- {}", name))
            .collect();
        (lines.join("\n"), BLUE)
    };

    let header = format!("**Filters:**\n{}\n\n**Results:**\n", filter_view);
    let budget = MAX_DESCRIPTION.saturating_sub(header.chars().count());
    EmbedSpec::new(colour)
        .title("Search Results")
        .description(format!("{}{}", header, fit_lines(&results, budget)))
}

/// Keep whole lines within `budget` characters, noting how many were left out.
fn fit_lines(lines: &str, budget: usize) -> String {
    if lines.chars().count() <= budget {
        return lines.to_string();
    }
    let all: Vec<&str> = lines.lines().collect();
    let mut kept = Vec::new();
    let mut used = 0;
    for (i, line) in all.iter().enumerate() {
        let note = format!("… and {} more", all.len() - i);
        if used + line.chars().count() + 1 + note.chars().count() > budget {
            kept.push(note);
            break;
        }
        used += line.chars().count() + 1;
        kept.push(line.to_string());
    }
    kept.join("\n")
}

/// `!genprompt`.
pub fn prompt(prompt: &Prompt) -> EmbedSpec {
    EmbedSpec::new(GREEN)
        .title("Prompt Generation")
        .field("Speaker", &prompt.speaker)
        .field("Listener", &prompt.listener)
        .field("Genre", &prompt.genre)
        .field("Trope", &prompt.trope)
}

/// `!help`.
pub fn help() -> EmbedSpec {
    EmbedSpec::new(GOLD).title("Help").description(HELP_TEXT)
}

/// Video metadata card.
pub fn video(info: &VideoInfo) -> EmbedSpec {
    let mut embed = EmbedSpec::new(BRAND_GREEN)
        .title(&info.title)
        .url(format!("https://youtu.be/{}", info.id))
        .field("Title", &info.title)
        .field("Uploader", &info.uploader)
        .field("Uploaded", youtube::format_upload_date(&info.upload_date))
        .field("Duration", youtube::format_duration(&info.duration_string))
        .field("View Count", youtube::format_count(info.view_count));
    if let Some(thumbnail) = &info.thumbnail {
        embed = embed.image(thumbnail);
    }
    embed
}

pub fn video_failure() -> EmbedSpec {
    EmbedSpec::new(BRAND_RED)
        .title("Failed to acquire video")
        .description("An unexpected error occured while acquiring the video information")
}

/// `!xagfs` announcement.
pub fn relay(text: &str) -> EmbedSpec {
    EmbedSpec::new(BLURPLE).description(text)
}

pub fn timestamp(input: &str, stamp: &str) -> String {
    format!("'{}' ⟶ {}", input, stamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use isabot_directory::{AliasTable, FilterSet, IntroductionRecord};

    #[test]
    fn test_user_info_lists_fields_in_post_order() {
        let introduction = Introduction {
            author: "Alice".to_string(),
            record: IntroductionRecord::parse("Username: alice\nGenres: Horror\nLinks:"),
        };
        let embed = user_info("ALICE", &introduction);
        assert_eq!(embed.title.as_deref(), Some("User Information: ALICE"));
        assert_eq!(embed.colour, DARK_PURPLE);
        assert_eq!(
            embed.fields,
            vec![
                ("Username".to_string(), "alice".to_string()),
                ("Genres".to_string(), "Horror".to_string()),
                ("Links".to_string(), "-".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_results_with_matches() {
        let filters = FilterSet::parse("roles=writer & genres=fantasy, horror", &AliasTable::default())
            .unwrap();
        let result = QueryResult {
            identities: vec!["alice".to_string(), "bob".to_string()],
            filters,
        };
        let embed = search_results(&result);
        assert_eq!(embed.colour, BLUE);
        assert_eq!(
            embed.description.as_deref(),
            Some(
                "**Filters:**\n- roles = writer\n- genres = fantasy | horror\n\n**Results:**\n- alice\n- bob"
            )
        );
    }

    #[test]
    fn test_search_results_without_matches() {
        let result = QueryResult {
            identities: Vec::new(),
            filters: FilterSet::parse("role=va", &AliasTable::default()).unwrap(),
        };
        let embed = search_results(&result);
        assert_eq!(embed.colour, BRAND_RED);
        assert!(embed.description.unwrap().ends_with("**Results:**\n:x: None"));
    }

    #[test]
    fn test_search_results_stay_within_embed_limit() {
        let result = QueryResult {
            identities: (0..500).map(|i| format!("user_with_a_long_name_{i:03}")).collect(),
            filters: FilterSet::new(),
        };
        let description = search_results(&result).description.unwrap();
        assert!(description.chars().count() <= MAX_DESCRIPTION);
        assert!(description.contains("more"));
        assert!(description.contains("- user_with_a_long_name_000"));
    }

    #[test]
    fn test_field_limits() {
        let embed = (0..30).fold(EmbedSpec::new(BLUE), |e, i| e.field(format!("k{i}"), "v"));
        assert_eq!(embed.fields.len(), MAX_FIELDS);

        let long = "x".repeat(2000);
        let embed = EmbedSpec::new(BLUE).field("k", long);
        assert_eq!(embed.fields[0].1.chars().count(), MAX_FIELD_VALUE);
    }

    #[test]
    fn test_timestamp_text() {
        assert_eq!(
            timestamp("tomorrow 5pm", "<t:1:F>"),
            "'tomorrow 5pm' ⟶ <t:1:F>"
        );
    }

    #[test]
    fn test_help_mentions_every_directive() {
        let text = help().description.unwrap();
        for directive in ["!showinfo", "!searchuser", "!genprompt", "!mrv", "!video-info", "!ts", "!tz"] {
            assert!(text.contains(directive), "{directive} missing from help");
        }
    }
}
