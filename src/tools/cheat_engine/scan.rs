//! String conversion, AOB scanning, disassembly and value scans.
use rmcp::{
    handler::server::wrapper::Parameters,
    model::{CallToolResult, ErrorData},
    tool, tool_router,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{
    client::{ApiCall, Endpoint},
    errors::{require_non_blank, RequestValidationError},
    request::{insert_some, AddressRequest, TextRequest},
};
use crate::server::runtime::CheatEngineServer;

pub const DEFAULT_STOP_ADDRESS: u64 = 0x0000_7fff_ffff_ffff;

/// Comparison performed by a first scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ScanOption {
    #[serde(rename = "soUnknownValue")]
    UnknownValue,
    #[serde(rename = "soExactValue")]
    ExactValue,
    #[serde(rename = "soValueBetween")]
    ValueBetween,
    #[serde(rename = "soBiggerThan")]
    BiggerThan,
    #[serde(rename = "soSmallerThan")]
    SmallerThan,
    #[serde(rename = "soIncreasedValue")]
    IncreasedValue,
    #[serde(rename = "soIncreasedValueBy")]
    IncreasedValueBy,
    #[serde(rename = "soDecreasedValue")]
    DecreasedValue,
    #[serde(rename = "soDecreasedValueBy")]
    DecreasedValueBy,
    #[serde(rename = "soChanged")]
    Changed,
    #[serde(rename = "soUnchanged")]
    Unchanged,
}

impl ScanOption {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ScanOption::UnknownValue => "soUnknownValue",
            ScanOption::ExactValue => "soExactValue",
            ScanOption::ValueBetween => "soValueBetween",
            ScanOption::BiggerThan => "soBiggerThan",
            ScanOption::SmallerThan => "soSmallerThan",
            ScanOption::IncreasedValue => "soIncreasedValue",
            ScanOption::IncreasedValueBy => "soIncreasedValueBy",
            ScanOption::DecreasedValue => "soDecreasedValue",
            ScanOption::DecreasedValueBy => "soDecreasedValueBy",
            ScanOption::Changed => "soChanged",
            ScanOption::Unchanged => "soUnchanged",
        }
    }

    /// Whether the scan compares against `input1`.
    pub const fn needs_input(&self) -> bool {
        !matches!(
            self,
            ScanOption::UnknownValue
                | ScanOption::IncreasedValue
                | ScanOption::DecreasedValue
                | ScanOption::Changed
                | ScanOption::Unchanged
        )
    }
}

/// Cheat Engine variable types. `code()` is the plugin's numeric encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub enum VariableType {
    #[serde(rename = "vtByte")]
    Byte,
    #[serde(rename = "vtWord")]
    Word,
    #[default]
    #[serde(rename = "vtDword")]
    Dword,
    #[serde(rename = "vtQword")]
    Qword,
    #[serde(rename = "vtSingle")]
    Single,
    #[serde(rename = "vtDouble")]
    Double,
    #[serde(rename = "vtString")]
    String,
    #[serde(rename = "vtByteArray")]
    ByteArray,
    #[serde(rename = "vtGrouped")]
    Grouped,
    #[serde(rename = "vtBinary")]
    Binary,
    #[serde(rename = "vtAll")]
    All,
}

impl VariableType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            VariableType::Byte => "vtByte",
            VariableType::Word => "vtWord",
            VariableType::Dword => "vtDword",
            VariableType::Qword => "vtQword",
            VariableType::Single => "vtSingle",
            VariableType::Double => "vtDouble",
            VariableType::String => "vtString",
            VariableType::ByteArray => "vtByteArray",
            VariableType::Grouped => "vtGrouped",
            VariableType::Binary => "vtBinary",
            VariableType::All => "vtAll",
        }
    }

    pub const fn code(&self) -> u8 {
        *self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub enum RoundingType {
    #[serde(rename = "rtRounded")]
    Rounded,
    #[default]
    #[serde(rename = "rtExtremerounded")]
    ExtremeRounded,
    #[serde(rename = "rtTruncated")]
    Truncated,
}

impl RoundingType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            RoundingType::Rounded => "rtRounded",
            RoundingType::ExtremeRounded => "rtExtremerounded",
            RoundingType::Truncated => "rtTruncated",
        }
    }
}

/// Fast-scan alignment. `aob_scan` sends the numeric code, `memscan` the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub enum AlignmentType {
    #[serde(rename = "fsmNotAligned")]
    NotAligned,
    #[default]
    #[serde(rename = "fsmAligned")]
    Aligned,
    #[serde(rename = "fsmLastDigits")]
    LastDigits,
}

impl AlignmentType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AlignmentType::NotAligned => "fsmNotAligned",
            AlignmentType::Aligned => "fsmAligned",
            AlignmentType::LastDigits => "fsmLastDigits",
        }
    }

    pub const fn code(&self) -> u8 {
        *self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionType {
    AnsiToUtf8,
    Utf8ToAnsi,
    StringToMd5,
}

impl ConversionType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConversionType::AnsiToUtf8 => "ansiToUtf8",
            ConversionType::Utf8ToAnsi => "utf8ToAnsi",
            ConversionType::StringToMd5 => "stringToMd5",
        }
    }
}

pub fn convert_call(
    request: &TextRequest,
    conversion: ConversionType,
) -> Result<ApiCall, RequestValidationError> {
    require_non_blank("text", &request.text)?;
    Ok(ApiCall::post(
        Endpoint::Convert,
        json!({
            "Input": request.text,
            "ConversionType": conversion.as_str(),
        }),
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisassembleRequestType {
    Disassemble,
    InstructionSize,
}

impl DisassembleRequestType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DisassembleRequestType::Disassemble => "disassemble",
            DisassembleRequestType::InstructionSize => "get-instruction-size",
        }
    }
}

pub fn disassemble_call(
    request: &AddressRequest,
    request_type: DisassembleRequestType,
) -> Result<ApiCall, RequestValidationError> {
    request.validate()?;
    Ok(ApiCall::post(
        Endpoint::Disassemble,
        json!({
            "RequestType": request_type.as_str(),
            "Address": request.address,
        }),
    ))
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AobScanRequest {
    /// Hex bytes, spaced or not; `?` or `??` matches any byte, e.g. `48 8B 05 ? ? ? ?` or `488B05????????`.
    pub aob_string: String,
    /// Protection filter such as `+W-C` or `+X`.
    #[serde(default)]
    pub protection_flags: Option<String>,
    #[serde(default)]
    pub alignment_type: Option<AlignmentType>,
    #[serde(default)]
    pub alignment_param: Option<String>,
}

impl AobScanRequest {
    pub fn to_call(&self) -> Result<ApiCall, RequestValidationError> {
        validate_aob_pattern(&self.aob_string)?;
        let mut body = json!({ "AOBString": self.aob_string });
        insert_some(&mut body, "ProtectionFlags", self.protection_flags.clone());
        insert_some(
            &mut body,
            "AlignmentType",
            self.alignment_type.map(|alignment| alignment.code()),
        );
        insert_some(&mut body, "AlignmentParam", self.alignment_param.clone());
        Ok(ApiCall::post(Endpoint::AobScan, body))
    }
}

/// Tokens are hex digits and `?`/`*` wildcards. A token longer than two
/// characters is an unspaced run of byte pairs, e.g. `488B05????????`.
pub fn validate_aob_pattern(pattern: &str) -> Result<(), RequestValidationError> {
    let mut tokens = pattern.split_whitespace().peekable();
    if tokens.peek().is_none() {
        return Err(RequestValidationError::Blank {
            field: "aob_string",
        });
    }
    for token in tokens {
        let symbols_ok = token
            .chars()
            .all(|c| c.is_ascii_hexdigit() || c == '?' || c == '*');
        let length_ok = token.len() <= 2 || token.len() % 2 == 0;
        if !(symbols_ok && length_ok) {
            return Err(RequestValidationError::InvalidAobToken {
                token: token.to_string(),
            });
        }
    }
    Ok(())
}

fn default_stop_address() -> u64 {
    DEFAULT_STOP_ADDRESS
}

fn default_protection_flags() -> String {
    "+W-C".to_string()
}

fn default_alignment_param() -> String {
    "4".to_string()
}

/// Input for `memscan`. Blocks until the plugin finishes the scan.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MemScanRequest {
    pub scan_option: ScanOption,
    pub var_type: VariableType,
    /// Value to compare against; not used by unknown/changed/unchanged scans.
    #[serde(default)]
    pub input1: Option<String>,
    /// Upper bound for `soValueBetween`.
    #[serde(default)]
    pub input2: Option<String>,
    #[serde(default)]
    pub rounding_type: RoundingType,
    #[serde(default)]
    pub start_address: u64,
    #[serde(default = "default_stop_address")]
    pub stop_address: u64,
    #[serde(default = "default_protection_flags")]
    pub protection_flags: String,
    #[serde(default)]
    pub alignment_type: AlignmentType,
    #[serde(default = "default_alignment_param")]
    pub alignment_param: String,
    #[serde(default)]
    pub is_hexadecimal: bool,
    #[serde(default)]
    pub is_not_binary_string: bool,
    #[serde(default)]
    pub is_unicode: bool,
    #[serde(default)]
    pub is_case_sensitive: bool,
}

impl MemScanRequest {
    pub fn validate(&self) -> Result<(), RequestValidationError> {
        let scan_option = self.scan_option.as_str();
        if self.scan_option.needs_input() && is_missing(&self.input1) {
            return Err(RequestValidationError::MissingScanInput {
                field: "input1",
                scan_option,
            });
        }
        if self.scan_option == ScanOption::ValueBetween && is_missing(&self.input2) {
            return Err(RequestValidationError::MissingScanInput {
                field: "input2",
                scan_option,
            });
        }
        if self.start_address > self.stop_address {
            return Err(RequestValidationError::InvertedRange {
                start: self.start_address,
                stop: self.stop_address,
            });
        }
        Ok(())
    }

    pub fn to_call(&self) -> Result<ApiCall, RequestValidationError> {
        self.validate()?;
        let mut body = json!({
            "ScanOption": self.scan_option.as_str(),
            "VarType": self.var_type.as_str(),
            "RoundingType": self.rounding_type.as_str(),
            "StartAddress": self.start_address,
            "StopAddress": self.stop_address,
            "ProtectionFlags": self.protection_flags,
            "AlignmentType": self.alignment_type.as_str(),
            "AlignmentParam": self.alignment_param,
            "IsHexadecimalInput": self.is_hexadecimal,
            "IsNotABinaryString": self.is_not_binary_string,
            "IsUnicodeScan": self.is_unicode,
            "IsCaseSensitive": self.is_case_sensitive,
        });
        insert_some(&mut body, "Input1", self.input1.clone());
        insert_some(&mut body, "Input2", self.input2.clone());
        Ok(ApiCall::post(Endpoint::MemScan, body))
    }
}

fn is_missing(input: &Option<String>) -> bool {
    input.as_deref().map_or(true, |value| value.trim().is_empty())
}

#[tool_router(router = scan_router, vis = "pub(crate)")]
impl CheatEngineServer {
    #[tool(
        name = "ansi_to_utf8",
        description = "Convert an ANSI encoded string to UTF-8"
    )]
    async fn ansi_to_utf8(
        &self,
        Parameters(request): Parameters<TextRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked(
            "ansi_to_utf8",
            convert_call(&request, ConversionType::AnsiToUtf8),
        )
        .await
    }

    #[tool(
        name = "utf8_to_ansi",
        description = "Convert a UTF-8 string to ANSI"
    )]
    async fn utf8_to_ansi(
        &self,
        Parameters(request): Parameters<TextRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked(
            "utf8_to_ansi",
            convert_call(&request, ConversionType::Utf8ToAnsi),
        )
        .await
    }

    #[tool(
        name = "string_to_md5",
        description = "Compute the MD5 hash of a string"
    )]
    async fn string_to_md5(
        &self,
        Parameters(request): Parameters<TextRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked(
            "string_to_md5",
            convert_call(&request, ConversionType::StringToMd5),
        )
        .await
    }

    #[tool(
        name = "aob_scan",
        description = "Scan the opened process for an array-of-bytes pattern and return matching addresses"
    )]
    async fn aob_scan(
        &self,
        Parameters(request): Parameters<AobScanRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked("aob_scan", request.to_call()).await
    }

    #[tool(
        name = "disassemble",
        description = "Disassemble the instruction at an address"
    )]
    async fn disassemble(
        &self,
        Parameters(request): Parameters<AddressRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked(
            "disassemble",
            disassemble_call(&request, DisassembleRequestType::Disassemble),
        )
        .await
    }

    #[tool(
        name = "get_instruction_size",
        description = "Return the size in bytes of the instruction at an address"
    )]
    async fn get_instruction_size(
        &self,
        Parameters(request): Parameters<AddressRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked(
            "get_instruction_size",
            disassemble_call(&request, DisassembleRequestType::InstructionSize),
        )
        .await
    }

    #[tool(
        name = "memscan",
        description = "Run a first value scan over the opened process and wait for the results"
    )]
    async fn memscan(
        &self,
        Parameters(request): Parameters<MemScanRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked("memscan", request.to_call()).await
    }

    #[tool(
        name = "memscan_reset",
        description = "Discard the current scan results so a new first scan can start"
    )]
    async fn memscan_reset(&self) -> Result<CallToolResult, ErrorData> {
        self.forward("memscan_reset", ApiCall::post_empty(Endpoint::MemScanReset))
            .await
    }
}
