use serde::Serialize;

/// Below this study percentage the month is considered unfocused.
pub const LOW_FOCUS_THRESHOLD: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub title: String,
    pub description: String,
}

/// The parts of a monthly rollup the suggestion rules look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestionMetrics {
    pub study_percentage: u32,
    pub current_study_seconds: i64,
    pub previous_study_seconds: i64,
}

pub fn suggest(metrics: &SuggestionMetrics) -> Vec<Suggestion> {
    let mut suggestions = Vec::with_capacity(2);

    if metrics.study_percentage < LOW_FOCUS_THRESHOLD {
        suggestions.push(Suggestion {
            title: "Sharpen your focus".to_string(),
            description: format!(
                "Study made up {}% of your tracked time this month. Review which apps fill your \
                 breaks and look for ways to study more efficiently.",
                metrics.study_percentage
            ),
        });
    } else {
        suggestions.push(Suggestion {
            title: "Steady progress".to_string(),
            description: "You are studying at a great pace. Keep it up and your goals will follow."
                .to_string(),
        });
    }

    if metrics.current_study_seconds > metrics.previous_study_seconds {
        suggestions.push(Suggestion {
            title: "Trending up".to_string(),
            description: "You studied more this week than last week. The habit is sticking."
                .to_string(),
        });
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::{suggest, SuggestionMetrics};

    fn titles(metrics: SuggestionMetrics) -> Vec<String> {
        suggest(&metrics).into_iter().map(|v| v.title).collect()
    }

    #[test]
    fn low_share_asks_for_focus() {
        let metrics = SuggestionMetrics {
            study_percentage: 49,
            current_study_seconds: 0,
            previous_study_seconds: 0,
        };

        let suggestions = suggest(&metrics);

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].title, "Sharpen your focus");
        assert!(suggestions[0].description.contains("49%"));
    }

    #[test]
    fn threshold_itself_is_reinforced() {
        let metrics = SuggestionMetrics {
            study_percentage: 50,
            current_study_seconds: 10,
            previous_study_seconds: 10,
        };

        assert_eq!(titles(metrics), vec!["Steady progress"]);
    }

    #[test]
    fn growth_over_previous_week_adds_trend() {
        let metrics = SuggestionMetrics {
            study_percentage: 20,
            current_study_seconds: 11,
            previous_study_seconds: 10,
        };

        assert_eq!(titles(metrics), vec!["Sharpen your focus", "Trending up"]);
    }
}
