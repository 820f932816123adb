pub mod forms;

pub use forms::{
    CountFormsOutput, CountSubmissionsInput, CountSubmissionsOutput, FormRecord,
    GetSubmissionInput, GetSubmissionOutput, SubmissionRecord, SubmitFormInput, SubmitFormOutput,
};
