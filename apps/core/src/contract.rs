use serde::{Deserialize, Serialize};

use crate::grouping::ResultGroup;
use crate::model::{CommandResult, Source};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultDto {
    pub index: Option<usize>,
    pub icon: String,
    pub display: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
    pub guarantee: bool,
    pub scope: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultGroupDto {
    pub scope: String,
    pub results: Vec<ResultDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlowDto {
    pub scope: String,
    pub instruction: Option<String>,
    pub icon: Option<String>,
}

/// Everything a renderer needs to draw the palette.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaletteView {
    pub shown: bool,
    pub input: String,
    pub active_result_index: usize,
    pub flow: Option<FlowDto>,
    pub groups: Vec<ResultGroupDto>,
}

/// The analytics form of a source: no icon and no resolver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourcePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub scope: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prefixes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
}

/// The analytics form of an executed result: no icon and no index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExecutedResultPayload {
    pub display: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
    pub guarantee: bool,
    pub executor: Option<String>,
    pub source: SourcePayload,
}

impl From<&CommandResult> for ResultDto {
    fn from(value: &CommandResult) -> Self {
        Self {
            index: value.index,
            icon: value.template.icon.name().to_string(),
            display: value.template.display.clone(),
            synonyms: value.template.synonyms.clone(),
            guarantee: value.template.guarantee,
            scope: value.scope().to_string(),
        }
    }
}

impl From<&ResultGroup> for ResultGroupDto {
    fn from(value: &ResultGroup) -> Self {
        Self {
            scope: value.scope.clone(),
            results: value.results.iter().map(ResultDto::from).collect(),
        }
    }
}

impl From<&Source> for SourcePayload {
    fn from(value: &Source) -> Self {
        match value {
            Source::Command(command) => Self {
                key: Some(command.key.clone()),
                scope: command.scope.clone(),
                prefixes: command.prefixes.clone(),
                instruction: None,
            },
            Source::Flow(flow) => Self {
                key: None,
                scope: flow.scope.clone(),
                prefixes: Vec::new(),
                instruction: flow.instruction.clone(),
            },
        }
    }
}

impl From<&CommandResult> for ExecutedResultPayload {
    fn from(value: &CommandResult) -> Self {
        Self {
            display: value.template.display.clone(),
            synonyms: value.template.synonyms.clone(),
            guarantee: value.template.guarantee,
            executor: value
                .template
                .executor
                .as_ref()
                .map(|executor| executor.kind().to_string()),
            source: SourcePayload::from(&value.source),
        }
    }
}
