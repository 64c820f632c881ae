use crate::infra::parse_stop_at;
use career_cat::assessment::{AssessmentRequest, AssessmentResult, ScoringOptions};
use career_cat::config::AppConfig;
use career_cat::error::AppError;
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file holding an assessment request (`{"answers": [...]}`)
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Override the question budget
    #[arg(long)]
    pub(crate) max_questions: Option<u32>,
    /// Override the early-stop confidence threshold, in (0, 1]
    #[arg(long, value_parser = parse_stop_at)]
    pub(crate) stop_at: Option<f64>,
    /// Print compact JSON instead of a readable summary
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        input,
        max_questions,
        stop_at,
        json,
    } = args;

    let config = AppConfig::load()?;
    let engine = config.assessment.scoring_engine()?;

    let request = read_request(&input)?;

    let options = config.assessment.defaults.with_overrides(
        max_questions.or(request.max_questions),
        stop_at.or(request.stop_at),
    );

    let result = engine.score(&request.answers, &options);

    if json {
        let rendered = serde_json::to_string(&result)?;
        println!("{rendered}");
    } else {
        print!("{}", render_summary(&result, request.answers.len(), &options));
    }
    Ok(())
}

fn read_request(path: &Path) -> Result<AssessmentRequest, AppError> {
    let raw = fs::read_to_string(path)?;
    let body: serde_json::Value = serde_json::from_str(&raw)?;
    Ok(AssessmentRequest::from_json(body)?)
}

fn render_summary(result: &AssessmentResult, answers: usize, options: &ScoringOptions) -> String {
    let mut out = String::new();
    out.push_str("Assessment summary\n");
    out.push_str(&format!(
        "  answers: {answers} of {} (stop at {:.2})\n",
        options.max_questions, options.stop_at_confidence
    ));
    out.push_str(&format!(
        "  confidence: {:.2} ({})\n",
        result.confidence,
        if result.done { "done" } else { "continue" }
    ));

    out.push_str("  riasec:");
    for code in career_cat::assessment::RiasecCode::ALL {
        out.push_str(&format!(" {}={:.3}", code.code(), result.riasec.get(code)));
    }
    out.push('\n');

    out.push_str("  recommendations:\n");
    if result.recommendations.is_empty() {
        out.push_str("    (none)\n");
    }
    for (rank, track) in result.recommendations.iter().enumerate() {
        let score = result.tracks.get(track).copied().unwrap_or_default();
        out.push_str(&format!("    {}. {track} ({score:.3})\n", rank + 1));
    }
    out
}
