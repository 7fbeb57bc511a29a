use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogError, build_catalog};
use crate::model::ids::PaperId;
use crate::model::paper::Paper;
use crate::model::question::{Question, QuestionTemplate};

/// Question templates grouped by category, in document order.
pub type QuestionTemplates = IndexMap<String, Vec<QuestionTemplate>>;

/// Papers to review and the questionnaire asked for each of them.
///
/// Fields absent from a config document default to empty, not to the
/// built-in set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewConfig {
    #[serde(default)]
    pub papers: Vec<Paper>,
    #[serde(default)]
    pub question_templates: QuestionTemplates,
}

impl ReviewConfig {
    /// The configuration used when no config file is available.
    #[must_use]
    pub fn builtin() -> Self {
        let papers = vec![
            Paper::new(PaperId::new(1), "Attention Is All You Need")
                .with_pdf_url("https://arxiv.org/pdf/1706.03762.pdf"),
            Paper::new(
                PaperId::new(2),
                "Highly accurate protein structure prediction with AlphaFold",
            )
            .with_pdf_url(
                "https://www.ncbi.nlm.nih.gov/pmc/articles/PMC8372483/pdf/41586_2021_3819_merged_1626279313.pdf",
            ),
            Paper::new(
                PaperId::new(3),
                "BERT: A Review of Applications in Biomedical Information Extraction",
            )
            .with_pdf_url(
                "https://www.ncbi.nlm.nih.gov/pmc/articles/PMC7356345/pdf/bioengineering-07-00057.pdf",
            ),
        ];

        let mut question_templates = QuestionTemplates::new();
        question_templates.insert(
            "understanding".into(),
            vec![
                QuestionTemplate::text(
                    "What is the main research question or problem addressed in this paper?",
                ),
                QuestionTemplate::text("What is the primary hypothesis or thesis statement?"),
                QuestionTemplate::text("What are the key objectives of this research?"),
            ],
        );
        question_templates.insert(
            "methodology".into(),
            vec![
                QuestionTemplate::multiple_choice(
                    "What research methodology was employed?",
                    [
                        "Experimental",
                        "Theoretical",
                        "Computational",
                        "Mixed Methods",
                        "Other",
                    ],
                ),
                QuestionTemplate::text("Describe the experimental setup or study design in detail."),
            ],
        );
        question_templates.insert(
            "results".into(),
            vec![
                QuestionTemplate::text("What are the three most significant findings?"),
                QuestionTemplate::multiple_choice(
                    "Were there any unexpected results?",
                    ["Yes", "No", "Somewhat"],
                ),
            ],
        );
        question_templates.insert(
            "analysis".into(),
            vec![
                QuestionTemplate::text("What are the main limitations?"),
                QuestionTemplate::multiple_choice(
                    "How robust are the conclusions?",
                    ["Very Robust", "Robust", "Moderate", "Weak", "Very Weak"],
                ),
            ],
        );
        question_templates.insert(
            "impact".into(),
            vec![
                QuestionTemplate::text("What are the practical applications?"),
                QuestionTemplate::rating("Rate the overall quality", 1, 5),
            ],
        );

        Self {
            papers,
            question_templates,
        }
    }

    #[must_use]
    pub fn paper(&self, id: PaperId) -> Option<&Paper> {
        self.papers.iter().find(|paper| paper.id == id)
    }

    /// Build the question catalog from this config's templates.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if any template is malformed.
    pub fn catalog(&self) -> Result<Vec<Question>, CatalogError> {
        build_catalog(&self.question_templates)
    }
}
