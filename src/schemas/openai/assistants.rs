//! OpenAI Assistants API (v1) schemas
//!
//! Assistants, threads, messages, runs and run steps, plus the request
//! bodies and list parameters of their endpoints.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationErrors};

use super::{ListResponse, TrueTag};
use crate::schemas::{
    validate_each, validate_function_name, validate_metadata, validate_one, whole_u32,
};

literal!(AssistantTag = "assistant");
literal!(AssistantFileTag = "assistant.file");
literal!(ThreadTag = "thread");
literal!(MessageTag = "thread.message");
literal!(MessageFileTag = "thread.message.file");
literal!(RunTag = "thread.run");
literal!(StepTag = "thread.run.step");
literal!(SubmitToolOutputsTag = "submit_tool_outputs");
literal!(AssistantDeletedTag = "assistant.deleted");
literal!(AssistantFileDeletedTag = "assistant.file.deleted");
literal!(ThreadDeletedTag = "thread.deleted");
literal!(MessageDeletedTag = "thread.message.deleted");

/// Up to 16 key-value pairs attached to an object.
pub type Metadata = HashMap<String, String>;

// ============================================================================
// Tools
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct FunctionDefinition {
    pub description: String,
    #[validate(custom(function = "validate_function_name"))]
    pub name: String,
    /// JSON Schema of the function parameters.
    pub parameters: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeInterpreterTool {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalTool {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct FunctionTool {
    #[validate(custom(function = "validate_one"))]
    pub function: FunctionDefinition,
}

/// Tool enabled on an assistant or run, discriminated on `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Tool {
    CodeInterpreter(CodeInterpreterTool),
    Retrieval(RetrievalTool),
    Function(FunctionTool),
}

impl Tool {
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Map<String, Value>,
    ) -> Self {
        Tool::Function(FunctionTool {
            function: FunctionDefinition {
                description: description.into(),
                name: name.into(),
                parameters,
            },
        })
    }
}

impl Validate for Tool {
    fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            Tool::Function(tool) => tool.validate(),
            Tool::CodeInterpreter(_) | Tool::Retrieval(_) => Ok(()),
        }
    }
}

// ============================================================================
// Assistants
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AssistantObject {
    pub id: String,
    pub created_at: i64,
    #[serde(default)]
    pub object: AssistantTag,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 256))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 512))]
    pub description: Option<String>,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 32768))]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 128), custom(function = "validate_each"))]
    pub tools: Option<Vec<Tool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 20))]
    pub file_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_metadata"))]
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AssistantFileObject {
    pub id: String,
    pub created_at: i64,
    #[serde(default)]
    pub object: AssistantFileTag,
    pub assistant_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateAssistantRequest {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 256))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 512))]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 32768))]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 128), custom(function = "validate_each"))]
    pub tools: Option<Vec<Tool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 20))]
    pub file_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_metadata"))]
    pub metadata: Option<Metadata>,
}

impl CreateAssistantRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            name: None,
            description: None,
            instructions: None,
            tools: None,
            file_ids: None,
            metadata: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn with_tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateAssistantFileRequest {
    pub file_id: String,
}

/// Every field of [`CreateAssistantRequest`], all optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ModifyAssistantRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 256))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 512))]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 32768))]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 128), custom(function = "validate_each"))]
    pub tools: Option<Vec<Tool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 20))]
    pub file_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_metadata"))]
    pub metadata: Option<Metadata>,
}

// ============================================================================
// Threads & Messages
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ThreadObject {
    pub id: String,
    pub created_at: i64,
    #[serde(default)]
    pub object: ThreadTag,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_metadata"))]
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub file_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageImageFileContent {
    pub image_file: FileRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCitation {
    pub file_id: String,
    pub quote: String,
}

/// Points to a quote from a retrieved file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCitationAnnotation {
    pub text: String,
    pub file_citation: FileCitation,
    pub start_index: u32,
    pub end_index: u32,
}

/// Points to a file generated by the code interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePathAnnotation {
    pub text: String,
    pub file_path: FileRef,
    pub start_index: u32,
    pub end_index: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageAnnotation {
    FileCitation(FileCitationAnnotation),
    FilePath(FilePathAnnotation),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageText {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Vec<MessageAnnotation>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct MessageTextContent {
    pub text: MessageText,
}

impl MessageTextContent {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            text: MessageText {
                value: value.into(),
                annotations: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    ImageFile(MessageImageFileContent),
    Text(MessageTextContent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    InProgress,
    Incomplete,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncompleteDetails {
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct MessageObject {
    pub id: String,
    pub created_at: i64,
    #[serde(default)]
    pub object: MessageTag,
    pub thread_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MessageStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incomplete_details: Option<IncompleteDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incomplete_at: Option<i64>,
    pub role: MessageRole,
    pub content: Vec<MessageContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assistant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 10))]
    pub file_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_metadata"))]
    pub metadata: Option<Metadata>,
}

impl MessageObject {
    /// Concatenated values of the text contents.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|c| match c {
                MessageContent::Text(t) => Some(t.text.value.as_str()),
                MessageContent::ImageFile(_) => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct MessageFileObject {
    pub id: String,
    pub created_at: i64,
    #[serde(default)]
    pub object: MessageFileTag,
    pub message_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateMessageRequest {
    pub role: MessageRole,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 10))]
    pub file_ids: Option<Vec<String>>,
}

impl CreateMessageRequest {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            file_ids: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateThreadRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_each"))]
    pub messages: Option<Vec<CreateMessageRequest>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_metadata"))]
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ModifyThreadRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_metadata"))]
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ModifyMessageRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_metadata"))]
    pub metadata: Option<Metadata>,
}

// ============================================================================
// Tool Calls
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeInterpreterLogOutput {
    pub logs: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeInterpreterImageOutput {
    pub image: FileRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CodeInterpreterOutput {
    Image(CodeInterpreterImageOutput),
    Logs(CodeInterpreterLogOutput),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeInterpreterDetail {
    pub input: String,
    pub outputs: Vec<CodeInterpreterOutput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeInterpreterToolCall {
    pub id: String,
    pub code_interpreter: CodeInterpreterDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalToolCall {
    pub id: String,
    /// Always an empty object for now.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieval: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCallDetail {
    pub name: String,
    pub arguments: String,
    /// Null until outputs are submitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionToolCall {
    pub id: String,
    pub function: FunctionCallDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolCall {
    CodeInterpreter(CodeInterpreterToolCall),
    Retrieval(RetrievalToolCall),
    Function(FunctionToolCall),
}

impl ToolCall {
    pub fn id(&self) -> &str {
        match self {
            ToolCall::CodeInterpreter(c) => &c.id,
            ToolCall::Retrieval(c) => &c.id,
            ToolCall::Function(c) => &c.id,
        }
    }
}

/// A function tool call with its `type` tag, as listed in a required action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequiredToolCall {
    Function(FunctionToolCall),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitToolOutputs {
    pub tool_calls: Vec<RequiredToolCall>,
}

/// Action required to continue a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SubmitToolOutputsAction {
    #[serde(rename = "type", default)]
    pub action_type: SubmitToolOutputsTag,
    pub submit_tool_outputs: SubmitToolOutputs,
}

// ============================================================================
// Runs & Steps
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Usage {
    pub completion_tokens: u32,
    pub prompt_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Expired,
}

impl RunStatus {
    /// Whether the run can no longer change state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Cancelled | RunStatus::Failed | RunStatus::Completed | RunStatus::Expired
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunErrorCode {
    ServerError,
    RateLimitExceeded,
    InvalidPrompt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunLastError {
    pub code: RunErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RunObject {
    pub id: String,
    pub created_at: i64,
    #[serde(default)]
    pub object: RunTag,
    pub thread_id: String,
    pub assistant_id: String,
    pub status: RunStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_action: Option<SubmitToolOutputsAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<RunLastError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_each"))]
    pub tools: Option<Vec<Tool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_metadata"))]
    pub metadata: Option<Metadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub temperature: Option<f64>,
}

impl RunObject {
    /// Function calls awaiting outputs, if the run requires action.
    pub fn pending_tool_calls(&self) -> impl Iterator<Item = &FunctionToolCall> {
        self.required_action
            .iter()
            .flat_map(|action| action.submit_tool_outputs.tool_calls.iter())
            .map(|RequiredToolCall::Function(call)| call)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageCreation {
    pub message_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageCreationDetail {
    pub message_creation: MessageCreation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallsDetail {
    pub tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepDetails {
    MessageCreation(MessageCreationDetail),
    ToolCalls(ToolCallsDetail),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    MessageCreation,
    ToolCalls,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    InProgress,
    Cancelled,
    Failed,
    Completed,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepErrorCode {
    ServerError,
    RateLimitExceeded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepLastError {
    pub code: StepErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct StepObject {
    pub id: String,
    pub created_at: i64,
    #[serde(default)]
    pub object: StepTag,
    pub assistant_id: String,
    pub thread_id: String,
    pub run_id: String,
    #[serde(rename = "type")]
    pub step_type: StepType,
    pub status: StepStatus,
    pub step_details: StepDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<StepLastError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_metadata"))]
    pub metadata: Option<Metadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateRunRequest {
    pub assistant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// Appended to the assistant instructions for this run only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_each"))]
    pub tools: Option<Vec<Tool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_metadata"))]
    pub metadata: Option<Metadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

impl CreateRunRequest {
    pub fn new(assistant_id: impl Into<String>) -> Self {
        Self {
            assistant_id: assistant_id.into(),
            model: None,
            instructions: None,
            additional_instructions: None,
            tools: None,
            metadata: None,
            temperature: None,
            stream: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateThreadAndRunRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_one"))]
    pub thread: Option<CreateThreadRequest>,
    #[serde(flatten)]
    #[validate(custom(function = "validate_one"))]
    pub run: CreateRunRequest,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ModifyRunRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_metadata"))]
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ToolOutput {
    pub tool_call_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SubmitToolOutputsToRunRequest {
    pub tool_outputs: Vec<ToolOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

// ============================================================================
// Deletion Responses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct DeleteAssistantResponse {
    pub id: String,
    #[serde(default)]
    pub deleted: TrueTag,
    #[serde(default)]
    pub object: AssistantDeletedTag,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct DeleteAssistantFileResponse {
    pub id: String,
    #[serde(default)]
    pub deleted: TrueTag,
    #[serde(default)]
    pub object: AssistantFileDeletedTag,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct DeleteThreadResponse {
    pub id: String,
    #[serde(default)]
    pub deleted: TrueTag,
    #[serde(default)]
    pub object: ThreadDeletedTag,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct DeleteMessageResponse {
    pub id: String,
    #[serde(default)]
    pub deleted: TrueTag,
    #[serde(default)]
    pub object: MessageDeletedTag,
}

// ============================================================================
// Lists & Parameters
// ============================================================================

pub type ListAssistantsResponse = ListResponse<AssistantObject>;
pub type ListAssistantFilesResponse = ListResponse<AssistantFileObject>;
pub type ListMessagesResponse = ListResponse<MessageObject>;
pub type ListMessageFilesResponse = ListResponse<MessageFileObject>;
pub type ListRunsResponse = ListResponse<RunObject>;
pub type ListRunStepsResponse = ListResponse<StepObject>;

fn default_limit() -> u32 {
    20
}

/// Accepts a whole number or a numeric string, as query strings carry them.
fn number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    let number = match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n,
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom)?,
    };
    whole_u32(number)
        .ok_or_else(|| serde::de::Error::custom(format!("expected a whole number, got {number}")))
}

/// Cursor pagination query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Pagination {
    /// Between 1 and 100.
    #[serde(default = "default_limit", deserialize_with = "number_or_string")]
    #[validate(range(min = 1, max = 100))]
    pub limit: u32,
    /// Object ID to list after.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    /// Object ID to list before.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            after: None,
            before: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    Asc,
    #[default]
    Desc,
}

/// Sort order by `created_at`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Ordering {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,
}
