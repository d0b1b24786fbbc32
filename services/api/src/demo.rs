use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate};
use clap::Args;

use buildflow::config::AppConfig;
use buildflow::error::AppError;
use buildflow::workflows::archive::ArchiveImporter;
use buildflow::workflows::review::{
    DashboardMetrics, DateWindow, GroupBy, ProjectStage, QuerySpec, ReviewLogService,
    ReviewRepository, ReviewSubmission, ReviewType, SortDirection,
};

use crate::infra::InMemoryReviewRepository;

#[derive(Args, Debug)]
pub(crate) struct LogReportArgs {
    /// Log collection to report on (constructability, permit-inspection, constraint)
    #[arg(long, default_value = "constructability", value_parser = parse_collection)]
    pub(crate) collection: ReviewType,
    /// Optional legacy CSV export to hydrate the log before reporting
    #[arg(long)]
    pub(crate) archive_csv: Option<PathBuf>,
    /// Window start (YYYY-MM-DD); requires --to
    #[arg(long, requires = "to", value_parser = crate::infra::parse_date)]
    pub(crate) from: Option<NaiveDate>,
    /// Window end (YYYY-MM-DD); requires --from
    #[arg(long, requires = "from", value_parser = crate::infra::parse_date)]
    pub(crate) to: Option<NaiveDate>,
    /// Breakdown dimension (stage, reviewer, project)
    #[arg(long, default_value = "stage", value_parser = parse_group_by)]
    pub(crate) group_by: GroupBy,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Review date for the demo records (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) review_date: Option<NaiveDate>,
    /// Reviewer credited in the demo wizard walk
    #[arg(long)]
    pub(crate) reviewer: Option<String>,
    /// Role the demo authors reviews under
    #[arg(long, default_value = "project-manager")]
    pub(crate) role: String,
}

fn parse_collection(raw: &str) -> Result<ReviewType, String> {
    ReviewType::from_slug(raw).ok_or_else(|| format!("unknown log collection '{raw}'"))
}

fn parse_group_by(raw: &str) -> Result<GroupBy, String> {
    GroupBy::from_slug(raw).ok_or_else(|| format!("unknown group_by '{raw}'"))
}

pub(crate) fn run_log_report(args: LogReportArgs) -> Result<(), AppError> {
    let LogReportArgs {
        collection,
        archive_csv,
        from,
        to,
        group_by,
    } = args;

    let config = AppConfig::load()?;
    let service = ReviewLogService::new(Arc::new(InMemoryReviewRepository::default()));

    match archive_csv {
        Some(path) => {
            let records = ArchiveImporter::from_path(path)?;
            let imported = records.len();
            for record in records {
                service.save_record(record).map_err(AppError::from)?;
            }
            println!("Hydrated {imported} record(s) from the archive export");
        }
        None => {
            seed_sample_records(&service, Local::now().date_naive())?;
            println!("No archive export provided; reporting on sample records");
        }
    }

    let window = match (from, to) {
        (Some(from), Some(to)) => Some(DateWindow { from, to }),
        _ => None,
    };

    let metrics = service
        .dashboard(collection, window, group_by)
        .map_err(AppError::from)?;
    render_metrics(collection, &metrics);

    let mut spec = QuerySpec::new("review_date", config.engine.default_page_size);
    spec.sort_direction = SortDirection::Desc;
    let page = service
        .log_page(collection, &spec)
        .map_err(AppError::from)?;

    println!("\nMost recent entries");
    if page.page.is_empty() {
        println!("- none");
    }
    for record in &page.page {
        let score_note = match &record.score {
            Some(score) => format!("{:.1} ({})", score.overall_score, score.band.label()),
            None => "unscored".to_string(),
        };
        println!(
            "- {} | {} | {} | {} | {}",
            record.draft.id.0,
            record.draft.project_name,
            record.draft.review_date,
            record.draft.status.label(),
            score_note
        );
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        review_date,
        reviewer,
        role,
    } = args;

    let review_date = review_date.unwrap_or_else(|| Local::now().date_naive());
    let reviewer = reviewer.unwrap_or_else(|| "Dana Mori".to_string());

    let service = ReviewLogService::new(Arc::new(InMemoryReviewRepository::default()));

    println!("Review wizard demo");
    let mut workflow = service
        .begin_review(ReviewType::Constructability, &role, review_date)
        .map_err(AppError::from)?;
    println!(
        "Opened {} as '{role}' ({} steps)",
        workflow.draft().id.0,
        workflow.total_steps()
    );

    match workflow.advance() {
        Err(error) => println!("Advance from step 1 blocked as expected: {error}"),
        Ok(_) => println!("Unexpectedly advanced with a blank draft"),
    }
    let blocked = workflow.validate_current();
    for failure in &blocked {
        println!("- step {} field '{}' is {}", failure.step, failure.field, failure.reason.code());
    }

    workflow
        .set_project_name("Riverside Clinic")
        .map_err(service_err)?;
    workflow
        .set_project_stage(ProjectStage::Design)
        .map_err(service_err)?;
    workflow.set_reviewer_name(reviewer).map_err(service_err)?;
    workflow.advance().map_err(service_err)?;
    println!("Details complete; now on step {}", workflow.current_step());

    for (category, value) in [
        ("design_completeness", 8.0),
        ("constructability", 7.5),
        ("coordination", 6.0),
        ("safety_in_design", 9.0),
        ("cost_alignment", 7.0),
        ("schedule_feasibility", 8.5),
    ] {
        workflow.rate(category, value).map_err(service_err)?;
    }
    workflow.advance().map_err(service_err)?;

    workflow
        .set_comments("Envelope and structure are buildable as drawn.")
        .map_err(service_err)?;
    workflow
        .add_recommendation("Pre-order long-lead switchgear.")
        .map_err(service_err)?;
    workflow.advance().map_err(service_err)?;

    service.save_draft(&mut workflow).map_err(AppError::from)?;
    let record = service
        .submit(&mut workflow, review_date)
        .map_err(AppError::from)?;

    let score = record.score.as_ref().expect("submitted records carry a score");
    println!(
        "Submitted {} scoring {:.1} ({})",
        record.draft.id.0,
        score.overall_score,
        score.band.label()
    );
    println!("Category contributions");
    for (category, contribution) in &score.category_contributions {
        println!("- {category}: {contribution:.2}");
    }

    seed_sample_records(&service, review_date)?;
    let metrics = service
        .dashboard(ReviewType::Constructability, None, GroupBy::Stage)
        .map_err(AppError::from)?;
    render_metrics(ReviewType::Constructability, &metrics);

    Ok(())
}

fn service_err(error: buildflow::workflows::review::WorkflowError) -> AppError {
    AppError::from(buildflow::workflows::review::ReviewServiceError::from(error))
}

fn seed_sample_records<R>(
    service: &ReviewLogService<R>,
    anchor: NaiveDate,
) -> Result<(), AppError>
where
    R: ReviewRepository + 'static,
{
    let samples = [
        ("Harbor Garage", ProjectStage::Construction, "Lee Ortiz", 28, 5.0),
        ("Summit Tower", ProjectStage::Design, "Priya Nair", 21, 6.5),
        ("Harbor Garage", ProjectStage::Construction, "Lee Ortiz", 14, 7.0),
        ("Summit Tower", ProjectStage::Design, "Priya Nair", 7, 8.5),
    ];

    for (project, stage, reviewer_name, days_ago, rating) in samples {
        let mut ratings = BTreeMap::new();
        for key in [
            "design_completeness",
            "constructability",
            "coordination",
            "safety_in_design",
            "cost_alignment",
            "schedule_feasibility",
        ] {
            ratings.insert(key.to_string(), rating);
        }

        let submission = ReviewSubmission {
            review_type: ReviewType::Constructability,
            role: "admin".to_string(),
            project_name: project.to_string(),
            project_stage: stage,
            reviewer_name: reviewer_name.to_string(),
            review_date: anchor - Duration::days(days_ago),
            ratings,
            comments: format!("Constructability pass for {project}."),
            recommendations: vec!["Carry comments into the next package.".to_string()],
            issues: Vec::new(),
            attachments: Vec::new(),
            submitted_on: None,
        };
        service
            .record_submission(submission)
            .map_err(AppError::from)?;
    }

    Ok(())
}

fn render_metrics(collection: ReviewType, metrics: &DashboardMetrics) {
    println!("\n{} dashboard", collection.label());
    println!(
        "- {} record(s), {} submitted ({:.0}% complete)",
        metrics.total_count,
        metrics.completed_count,
        metrics.completion_rate * 100.0
    );
    println!("- average score {:.2}", metrics.average_score);
    println!("- trend {:+.1}% against the earlier half", metrics.trend_pct);

    println!("\nCategory averages");
    for entry in &metrics.category_distribution {
        println!("- {}: {:.2}", entry.name, entry.average);
    }

    println!("\nBreakdown");
    for group in &metrics.groups {
        println!(
            "- {}: {} record(s), average {:.2}",
            group.group_key, group.count, group.average_score
        );
    }
}
