use tracing::{debug, trace};

use crate::transcode::common::error::{Result, TranscodeError};
use crate::transcode::core::matchers::{self, MatchResult, RequirementMatcher};
use crate::transcode::core::operation::Parameters;
use crate::transcode::core::rule::Rule;

/// Selects the first registered rule whose every matcher succeeds.
pub struct RuleMatcher {
    rules: Vec<Rule>,
    requirement_matchers: Vec<Box<dyn RequirementMatcher>>,
}

impl RuleMatcher {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self::with_matchers(rules, matchers::all())
    }

    pub fn with_matchers(
        rules: Vec<Rule>,
        requirement_matchers: Vec<Box<dyn RequirementMatcher>>,
    ) -> Self {
        Self {
            rules,
            requirement_matchers,
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn find_first_matching(&self, parameters: &Parameters) -> Result<&Rule> {
        for rule in &self.rules {
            match self.matches_requirements(rule, parameters) {
                Ok(()) => {
                    debug!("Rule '{}' matches", rule.name);
                    return Ok(rule);
                }
                Err(reason) => trace!("Rule '{}' rejected: {}", rule.name, reason),
            }
        }

        Err(TranscodeError::NoMatchingRule(format!(
            "{} -> {} among {} rules",
            parameters.input_image_specification.format,
            parameters.output_image_format,
            self.rules.len()
        )))
    }

    fn matches_requirements(&self, rule: &Rule, parameters: &Parameters) -> MatchResult {
        self.requirement_matchers
            .iter()
            .try_for_each(|matcher| matcher.matches(rule, parameters))
    }
}
