//! Console output formatter for verification results

use crate::output::formatter::OutputFormatter;
use colored::{ColoredString, Colorize};
use serde::Serialize;
use verity_domain::{
    AgentStatus, BatchOutcome, BatchResult, DomainVerdict, HealthStatus, OutputFormat,
    SourceReport, SourceStatus, SystemHealth, SystemMetrics, VerificationResult,
};

/// Formats verification results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete result
    pub fn format(result: &VerificationResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Verification Results"));
        output.push('\n');
        output.push_str(&Self::result_overview(result));

        for verdict in &result.verdicts {
            output.push_str(&Self::section_header(&Self::domain_title(verdict)));
            output.push_str(&Self::verdict_body(verdict));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(result: &VerificationResult) -> String {
        Self::json(result)
    }

    /// One line per verdict (concise output)
    pub fn format_summary(result: &VerificationResult) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{} {}  {} {:.2}\n",
            Self::trust_badge(result.trustworthy),
            format!("[{}]", result.kind).dimmed(),
            "confidence".dimmed(),
            result.unified_confidence
        ));
        for verdict in &result.verdicts {
            output.push_str(&format!("  {}\n", Self::verdict_line(verdict)));
        }
        output
    }

    pub fn format_batch(batch: &BatchResult, format: OutputFormat) -> String {
        if format == OutputFormat::Json {
            return Self::json(batch);
        }

        let mut output = String::new();
        output.push_str(&Self::header("Batch Results"));
        output.push('\n');
        output.push_str(&format!(
            "{} {}   {} {}   {} {}   {} {}ms\n",
            "Items:".cyan().bold(),
            batch.summary.total,
            "Succeeded:".cyan().bold(),
            batch.summary.succeeded.to_string().green(),
            "Failed:".cyan().bold(),
            Self::failure_count(batch.summary.failed),
            "Time:".cyan().bold(),
            batch.processing_ms
        ));

        for item in &batch.items {
            output.push_str(&format!(
                "\n{}\n",
                format!("── #{} {} ──", item.index, item.kind).yellow().bold()
            ));
            match &item.outcome {
                BatchOutcome::Succeeded { result } => {
                    let body = match format {
                        OutputFormat::Full => Self::format(result),
                        _ => Self::format_summary(result),
                    };
                    output.push_str(&body);
                }
                BatchOutcome::Failed { error } => {
                    output.push_str(&format!("{} {}\n", "Error:".red().bold(), error));
                }
            }
        }

        output.push_str(&Self::footer());
        output
    }

    pub fn format_health(health: &SystemHealth, format: OutputFormat) -> String {
        if format == OutputFormat::Json {
            return Self::json(health);
        }

        let mut output = String::new();
        output.push_str(&format!(
            "{} {}\n",
            "System health:".cyan().bold(),
            Self::health_status(health.status)
        ));
        for agent in &health.agents {
            output.push_str(&format!(
                "  {:<24} {:<14} requests {:>4}  success {:>5.1}%  avg {:>7.1}ms\n",
                agent.agent_id,
                Self::agent_status(agent.status),
                agent.total_requests,
                agent.success_rate * 100.0,
                agent.average_response_ms
            ));
            if let Some(error) = &agent.last_error
                && format == OutputFormat::Full
            {
                output.push_str(&format!("    {} {}\n", "last error:".red(), error));
            }
        }
        if !health.recommendations.is_empty() {
            output.push_str(&format!("\n{}\n", "Recommendations:".yellow().bold()));
            for recommendation in &health.recommendations {
                output.push_str(&format!("  * {}\n", recommendation));
            }
        }
        output
    }

    pub fn format_metrics(metrics: &SystemMetrics, format: OutputFormat) -> String {
        if format == OutputFormat::Json {
            return Self::json(metrics);
        }

        let mut output = String::new();
        output.push_str(&format!("{}\n", "System metrics".cyan().bold()));
        output.push_str(&format!(
            "  requests {}  ok {}  failed {}  cache hits {}\n",
            metrics.total_requests,
            metrics.successful_requests,
            metrics.failed_requests,
            metrics.cache_hits
        ));
        output.push_str(&format!(
            "  success {:.1}%  errors {:.1}%  avg response {:.1}ms\n",
            metrics.success_rate * 100.0,
            metrics.error_rate * 100.0,
            metrics.average_response_ms
        ));
        if format == OutputFormat::Full {
            let target = &metrics.target_accuracy;
            output.push_str(&format!(
                "  target accuracy: information {:.0}%, hallucination {:.0}%, sources {:.0}%\n",
                target.information_verification * 100.0,
                target.hallucination_detection * 100.0,
                target.source_verification * 100.0
            ));
        }
        output
    }

    // ==================== Sections ====================

    fn result_overview(result: &VerificationResult) -> String {
        format!(
            "{} {}\n{} {}\n{} {}\n{} {:.2}\n{} {}ms ({})\n",
            "Request:".cyan().bold(),
            result.request_id,
            "Kind:".cyan().bold(),
            result.kind,
            "Verdict:".cyan().bold(),
            Self::trust_badge(result.trustworthy),
            "Confidence:".cyan().bold(),
            result.unified_confidence,
            "Time:".cyan().bold(),
            result.processing_ms,
            result.agents.join(", ")
        )
    }

    fn verdict_body(verdict: &DomainVerdict) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n{}\n", Self::verdict_line(verdict)));

        if let Some(rule) = verdict.rule_outcome() {
            output.push_str(&format!(
                "Rule: {} ({} flags, {} strong)\n",
                rule.branch, rule.flag_count, rule.strong_flag_count
            ));
        }
        if let Some(consensus) = verdict.consensus() {
            output.push_str(&format!(
                "Consensus: {} ({:.2} vs {:.2})\n",
                consensus.outcome, consensus.score, consensus.threshold
            ));
        }

        if !verdict.votes().is_empty() {
            output.push_str(&format!("\n{}\n", "Votes:".cyan().bold()));
            for vote in verdict.votes() {
                let mark = if vote.degraded {
                    "?".yellow()
                } else if vote.is_positive() {
                    "●".normal()
                } else {
                    "○".normal()
                };
                output.push_str(&format!(
                    "  {} {:<20} score {:.2}  conf {:.2}  {}\n",
                    mark,
                    vote.provider,
                    vote.score(),
                    vote.confidence,
                    vote.rationale.dimmed()
                ));
            }
        }

        if !verdict.factors().is_empty() {
            output.push_str(&format!("\n{}\n", "Factors:".cyan().bold()));
            for (name, value) in verdict.factors() {
                output.push_str(&format!("  {:<22} {:.2}\n", name, value));
            }
        }

        if let Some(report) = verdict.source_report() {
            output.push_str(&Self::source_table(report));
        }

        if !verdict.warnings().is_empty() {
            output.push_str(&format!("\n{}\n", "Warnings:".yellow().bold()));
            for warning in verdict.warnings() {
                output.push_str(&format!("  * {}\n", warning));
            }
        }
        if !verdict.suggestions().is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".green().bold()));
            for suggestion in verdict.suggestions() {
                output.push_str(&format!("  * {}\n", suggestion));
            }
        }
        output
    }

    fn source_table(report: &SourceReport) -> String {
        let mut output = format!(
            "\n{}{}\n",
            "Sources:".cyan().bold(),
            if report.discovered { " (discovered)" } else { "" }
        );
        if report.is_empty() {
            output.push_str("  none checked\n");
            return output;
        }
        for check in &report.checks {
            output.push_str(&format!(
                "  {:<11} {:.2}  {}\n",
                Self::source_status(check.status),
                check.credibility,
                check.uri
            ));
            if let Some(error) = &check.error {
                output.push_str(&format!("              {}\n", error.dimmed()));
            }
        }
        output
    }

    // ==================== Helpers ====================

    fn verdict_line(verdict: &DomainVerdict) -> String {
        let label = if verdict.supports_trust() {
            verdict.label().green()
        } else {
            verdict.label().red()
        };
        let degraded = verdict.degraded_providers();
        let degraded = if degraded.is_empty() {
            String::new()
        } else {
            format!("  {}", format!("degraded: {}", degraded.join(", ")).yellow())
        };
        format!(
            "{:<26} {:<26} {:.2} {}{}",
            verdict.domain().as_str(),
            label,
            verdict.confidence(),
            verdict.vote_summary(),
            degraded
        )
    }

    fn domain_title(verdict: &DomainVerdict) -> String {
        verdict
            .domain()
            .as_str()
            .split('_')
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<String>>()
            .join(" ")
    }

    fn trust_badge(trustworthy: bool) -> ColoredString {
        if trustworthy {
            "TRUSTWORTHY".green().bold()
        } else {
            "NOT TRUSTWORTHY".red().bold()
        }
    }

    fn failure_count(failed: usize) -> ColoredString {
        if failed == 0 {
            failed.to_string().normal()
        } else {
            failed.to_string().red()
        }
    }

    fn health_status(status: HealthStatus) -> ColoredString {
        match status {
            HealthStatus::Healthy => "healthy".green().bold(),
            HealthStatus::Degraded => "degraded".yellow().bold(),
            HealthStatus::Unhealthy => "unhealthy".red().bold(),
        }
    }

    fn agent_status(status: AgentStatus) -> ColoredString {
        match status {
            AgentStatus::Active => "active".green(),
            AgentStatus::Inactive => "inactive".yellow(),
            AgentStatus::Uninitialized => "uninitialized".dimmed(),
            AgentStatus::Error => "error".red(),
        }
    }

    fn source_status(status: SourceStatus) -> ColoredString {
        match status {
            SourceStatus::Verified => status.as_str().green(),
            SourceStatus::Disputed => status.as_str().yellow(),
            SourceStatus::Unverified => status.as_str().red(),
            SourceStatus::Invalid => status.as_str().red().dimmed(),
        }
    }

    fn json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_full(&self, result: &VerificationResult) -> String {
        Self::format(result)
    }

    fn format_summary(&self, result: &VerificationResult) -> String {
        Self::format_summary(result)
    }

    fn format_json(&self, result: &VerificationResult) -> String {
        Self::format_json(result)
    }

    fn format_batch(&self, batch: &BatchResult, format: OutputFormat) -> String {
        Self::format_batch(batch, format)
    }
}
