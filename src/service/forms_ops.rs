use crate::db::models::NewSubmission;
use crate::db::sqlite::FormsStorage;
use crate::error::FormsError;
use crate::service::sanitize::{
    is_email, sanitize_email, sanitize_text_field, sanitize_textarea_field,
};
use crate::types::forms::{
    CountFormsOutput, CountSubmissionsInput, CountSubmissionsOutput, FormRecord,
    GetSubmissionInput, GetSubmissionOutput, SubmitFormInput, SubmitFormOutput,
};
use tracing::{debug, info, warn};

/// Whether `count_forms` also returns the rows it counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormsListing {
    CountOnly,
    WithForms,
}

/// Business operations over the forms store.
#[derive(Clone)]
pub struct FormsOps {
    storage: FormsStorage,
}

impl FormsOps {
    pub fn new(storage: FormsStorage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &FormsStorage {
        &self.storage
    }

    /// Validate, check the form exists, insert.
    ///
    /// The existence check and the insert are separate statements; a form
    /// appearing or disappearing in between is tolerated.
    pub async fn submit_form(&self, input: SubmitFormInput) -> SubmitFormOutput {
        let name = sanitize_text_field(&input.name);
        let email = sanitize_email(&input.email);
        let message = sanitize_textarea_field(&input.message);

        if !is_email(&email) {
            debug!(form_id = input.form_id, "submit rejected: invalid email");
            return SubmitFormOutput::failed("Invalid email address.");
        }

        match self.storage.form_exists(input.form_id).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(form_id = input.form_id, "submit rejected: unknown form");
                return SubmitFormOutput::failed("Form not found.");
            }
            Err(e) => {
                warn!(form_id = input.form_id, error = %e, "form lookup failed");
                return SubmitFormOutput::failed("Failed to submit form.");
            }
        }

        let new = NewSubmission {
            form_id: input.form_id,
            name,
            email,
            message,
        };
        match self.storage.insert_submission(new).await {
            Ok(id) => {
                info!(form_id = input.form_id, submission_id = id, "form submitted");
                SubmitFormOutput {
                    success: true,
                    submission_id: Some(id),
                    message: "Form submitted successfully.".to_string(),
                }
            }
            Err(e) => {
                warn!(form_id = input.form_id, error = %e, "submission insert failed");
                SubmitFormOutput::failed("Failed to submit form.")
            }
        }
    }

    pub async fn get_submission(&self, input: GetSubmissionInput) -> GetSubmissionOutput {
        match self.storage.get_submission(input.submission_id).await {
            Ok(Some(row)) => GetSubmissionOutput {
                success: true,
                submission: Some(row.into()),
                message: "Submission retrieved successfully.".to_string(),
            },
            Ok(None) => GetSubmissionOutput::failed("Submission not found."),
            Err(e) => {
                warn!(submission_id = input.submission_id, error = %e, "submission lookup failed");
                GetSubmissionOutput::failed("Failed to retrieve submission.")
            }
        }
    }

    pub async fn count_forms(&self, listing: FormsListing) -> Result<CountFormsOutput, FormsError> {
        match listing {
            FormsListing::CountOnly => Ok(CountFormsOutput {
                count: self.storage.count_forms().await?,
                forms: None,
            }),
            FormsListing::WithForms => {
                let forms: Vec<FormRecord> = self
                    .storage
                    .list_forms()
                    .await?
                    .into_iter()
                    .map(FormRecord::from)
                    .collect();
                Ok(CountFormsOutput {
                    count: forms.len() as i64,
                    forms: Some(forms),
                })
            }
        }
    }

    pub async fn count_submissions(
        &self,
        input: CountSubmissionsInput,
    ) -> Result<CountSubmissionsOutput, FormsError> {
        let count = match input.form_id {
            Some(form_id) => self.storage.count_submissions_for_form(form_id).await?,
            None => self.storage.count_submissions().await?,
        };
        Ok(CountSubmissionsOutput {
            count,
            form_id: input.form_id,
        })
    }
}
