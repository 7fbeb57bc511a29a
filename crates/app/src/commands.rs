use std::fmt;
use std::path::Path;

use review_core::model::{PaperId, QuestionId, QuestionKey, QuestionKind};
use review_core::{PaperStatus, Progress, compute_progress, group_by_category};
use services::{
    AppServices, ConfigSource, DocumentState, OpenedSession, PdfSource, read_local_pdf,
    resolve_pdf_source,
};

#[derive(Debug)]
pub(crate) enum CommandError {
    UnknownPaper(PaperId),
    AdminRejected,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::UnknownPaper(id) => write!(f, "no paper with id {id} in the config"),
            CommandError::AdminRejected => write!(f, "invalid admin credentials"),
        }
    }
}

impl std::error::Error for CommandError {}

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Parse `--set` values such as `3=Experimental` or `q_10=4`.
pub(crate) fn parse_assignment(raw: &str) -> Result<(QuestionId, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected QUESTION=VALUE, got \"{raw}\""))?;
    let key: QuestionKey = key.parse().map_err(|err| format!("{err}"))?;
    Ok((key.question_id(), value.to_owned()))
}

fn progress_line(progress: &Progress) -> String {
    format!(
        "{}/{} answered ({:.0}%)",
        progress.answered,
        progress.total,
        progress.fraction * 100.0
    )
}

async fn open(services: &AppServices) -> OpenedSession {
    if let ConfigSource::BuiltinFallback(reason) = services.config_source() {
        eprintln!("warning: using built-in config ({reason})");
    }
    let opened = services.responses().open_session().await;
    if let DocumentState::Corrupt { reason, moved_to } = &opened.state {
        eprintln!("warning: saved responses could not be read, starting empty ({reason})");
        if let Some(backup) = moved_to {
            eprintln!("warning: unreadable file kept at {}", backup.display());
        }
    }
    opened
}

pub(crate) async fn papers(services: &AppServices) -> CommandResult {
    let opened = open(services).await;
    let questions = services.questions();

    for paper in services.papers() {
        let progress = compute_progress(questions, &opened.collection.load(paper.id));
        let status = PaperStatus::of(opened.collection.record(paper.id), questions.len());
        println!(
            "{:>4}  {:<12} {:>5}/{:<3} {}",
            paper.id.value(),
            status.label(),
            progress.answered,
            progress.total,
            paper.title
        );
    }
    Ok(())
}

pub(crate) async fn show(services: &AppServices, paper_id: PaperId) -> CommandResult {
    let paper = services
        .paper(paper_id)
        .ok_or(CommandError::UnknownPaper(paper_id))?;
    let opened = open(services).await;
    let responses = opened.collection.load(paper.id);
    let questions = services.questions();

    println!("{}", paper.title);
    for (category, members) in group_by_category(questions) {
        println!();
        println!("[{category}]");
        for question in members {
            println!(
                "  {:<5} {}. {} ({})",
                question.key().to_string(),
                question.id().display_number(),
                question.text(),
                question.kind()
            );
            match question.kind() {
                QuestionKind::MultipleChoice => {
                    println!("     options: {}", question.options().join(" | "));
                }
                QuestionKind::Rating => {
                    println!("     scale: {}..{}", question.min(), question.max());
                }
                QuestionKind::Text => {}
            }
            match responses.get(question.id()) {
                Some(value) if value.is_answered() => println!("     > {value}"),
                _ => println!("     > (unanswered)"),
            }
        }
    }

    println!();
    println!("{}", progress_line(&compute_progress(questions, &responses)));
    if let Some(saved_at) = opened.collection.record(paper.id).and_then(|r| r.timestamp) {
        println!("last saved {saved_at}");
    }
    Ok(())
}

pub(crate) async fn answer(
    services: &AppServices,
    paper_id: PaperId,
    answers: &[(QuestionId, String)],
) -> CommandResult {
    let paper = services
        .paper(paper_id)
        .ok_or(CommandError::UnknownPaper(paper_id))?;
    let mut opened = open(services).await;

    let outcome = services
        .responses()
        .apply_answers(&mut opened.collection, paper, services.questions(), answers)
        .await?;

    println!("{}", progress_line(&outcome.progress));
    if outcome.record.completed {
        println!("all questions answered");
    }
    if let Some(err) = &outcome.persist_error {
        eprintln!("warning: responses were not written to disk: {err}");
    }
    Ok(())
}

pub(crate) async fn export(
    services: &AppServices,
    user: &str,
    password: &str,
    out: &Path,
) -> CommandResult {
    if !services.admin().check_login(user, password).await {
        return Err(CommandError::AdminRejected.into());
    }

    let report = services.export().export_to_dir(out).await?;
    println!(
        "exported {} papers ({} answers) to {}",
        report.papers,
        report.answered,
        report.path.display()
    );
    Ok(())
}

pub(crate) async fn pdf(services: &AppServices, paper_id: PaperId) -> CommandResult {
    let paper = services
        .paper(paper_id)
        .ok_or(CommandError::UnknownPaper(paper_id))?;

    match resolve_pdf_source(paper) {
        PdfSource::Remote(url) => println!("{url}"),
        PdfSource::EmbedBlocked(url) => {
            println!("{url}");
            eprintln!("note: this host blocks embedding; open the link in a browser");
        }
        PdfSource::Local(path) => {
            let size = read_local_pdf(paper).await.map_or(0, |b| b.len());
            println!("{} ({size} bytes)", path.display());
        }
        PdfSource::Unavailable => println!("no PDF available for this paper"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use review_core::time::fixed_clock;
    use services::{AdminGate, ReviewSettings};

    async fn services_in(dir: &Path) -> AppServices {
        let settings = ReviewSettings {
            responses_path: dir.join("responses.json"),
            config_path: dir.join("papers_config.json"),
        };
        AppServices::new_json(&settings, fixed_clock(), AdminGate::new("admin", "pw"))
            .await
            .unwrap()
    }

    #[test]
    fn assignments_accept_bare_and_prefixed_ids() {
        assert_eq!(
            parse_assignment("3=Experimental").unwrap(),
            (QuestionId::new(3), "Experimental".to_owned())
        );
        assert_eq!(
            parse_assignment("q_10=a=b").unwrap(),
            (QuestionId::new(10), "a=b".to_owned())
        );
        assert_eq!(parse_assignment("0=").unwrap().1, "");
    }

    #[test]
    fn assignments_reject_malformed_input() {
        assert!(parse_assignment("no-equals").is_err());
        assert!(parse_assignment("x_1=yes").is_err());
    }

    #[test]
    fn progress_line_rounds_percent() {
        let line = progress_line(&Progress {
            answered: 3,
            total: 5,
            fraction: 0.6,
        });
        assert_eq!(line, "3/5 answered (60%)");
    }

    #[tokio::test]
    async fn answering_one_question_keeps_earlier_answers() {
        let dir = tempfile::tempdir().unwrap();
        let services = services_in(dir.path()).await;
        let paper = PaperId::new(1);

        answer(&services, paper, &[(QuestionId::new(0), "Attention".into())])
            .await
            .unwrap();
        answer(&services, paper, &[(QuestionId::new(3), "Experimental".into())])
            .await
            .unwrap();

        let reopened = services_in(dir.path()).await.responses().open_session().await;
        let saved = reopened.collection.load(paper);
        assert_eq!(saved.len(), 2);
        assert_eq!(saved.get(QuestionId::new(0)).unwrap().to_string(), "Attention");
        assert_eq!(saved.get(QuestionId::new(3)).unwrap().to_string(), "Experimental");
    }

    #[tokio::test]
    async fn invalid_answer_leaves_the_document_unwritten() {
        let dir = tempfile::tempdir().unwrap();
        let services = services_in(dir.path()).await;

        let result = answer(&services, PaperId::new(1), &[(QuestionId::new(10), "nine".into())]).await;
        assert!(result.is_err());
        assert!(!dir.path().join("responses.json").exists());
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_credentials_write_no_export() {
        let dir = tempfile::tempdir().unwrap();
        let services = services_in(dir.path()).await;
        answer(&services, PaperId::new(2), &[(QuestionId::new(0), "Folding".into())])
            .await
            .unwrap();
        let out = dir.path().join("exports");

        let err = export(&services, "admin", "wrong", &out).await.unwrap_err();
        assert_eq!(err.to_string(), "invalid admin credentials");
        assert!(!out.exists());

        export(&services, "admin", "pw", &out).await.unwrap();
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 1);
    }
}
