//! Typed memory reads and writes, against the opened process or Cheat Engine itself.
//!
//! Every tool has a `_local` twin. Both hit the same endpoint; the twin appends
//! `local` to the `DataType` sent to the plugin.
use rmcp::{
    handler::server::wrapper::Parameters,
    model::{CallToolResult, ErrorData},
    tool, tool_router,
};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{
    client::{ApiCall, Endpoint},
    errors::{require_non_blank, require_range, RequestValidationError},
    request::{default_true, AddressRequest},
};
use crate::server::runtime::CheatEngineServer;
use MemoryTarget::{Local, Process};

pub const MAX_TRANSFER_LEN: u32 = 65_536;

const SMALL_INTEGER_RANGE: (i128, i128) = (i16::MIN as i128, u16::MAX as i128);
const INTEGER_RANGE: (i128, i128) = (i32::MIN as i128, u32::MAX as i128);

/// Whose address space a memory tool touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryTarget {
    /// The process opened with `open_process`.
    Process,
    /// Cheat Engine's own memory.
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bytes,
    SmallInteger,
    Integer,
    Qword,
    Pointer,
    Float,
    Double,
    String,
}

impl ValueKind {
    pub const fn wire_name(&self) -> &'static str {
        match self {
            ValueKind::Bytes => "bytes",
            ValueKind::SmallInteger => "smallinteger",
            ValueKind::Integer => "integer",
            ValueKind::Qword => "qword",
            ValueKind::Pointer => "pointer",
            ValueKind::Float => "float",
            ValueKind::Double => "double",
            ValueKind::String => "string",
        }
    }

    /// `DataType` value for the given target, e.g. `integerlocal`.
    pub fn data_type(&self, target: MemoryTarget) -> String {
        match target {
            MemoryTarget::Process => self.wire_name().to_string(),
            MemoryTarget::Local => format!("{}local", self.wire_name()),
        }
    }
}

fn memory_body(address: &str, kind: ValueKind, target: MemoryTarget) -> Value {
    json!({
        "Address": address,
        "DataType": kind.data_type(target),
    })
}

/// Read of a value that takes no options beyond its address.
pub fn read_value_call(
    request: &AddressRequest,
    kind: ValueKind,
    target: MemoryTarget,
) -> Result<ApiCall, RequestValidationError> {
    request.validate()?;
    Ok(ApiCall::post(
        Endpoint::ReadMemory,
        memory_body(&request.address, kind, target),
    ))
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ReadBytesRequest {
    pub address: String,
    /// Number of bytes to read (1-65536).
    pub byte_count: u32,
    /// Return the bytes as one array instead of separate values.
    #[serde(default = "default_true")]
    pub return_as_table: bool,
}

impl ReadBytesRequest {
    pub fn to_call(&self, target: MemoryTarget) -> Result<ApiCall, RequestValidationError> {
        require_non_blank("address", &self.address)?;
        require_range(
            "byte_count",
            self.byte_count.into(),
            1,
            MAX_TRANSFER_LEN.into(),
        )?;
        let mut body = memory_body(&self.address, ValueKind::Bytes, target);
        body["ByteCount"] = json!(self.byte_count);
        body["ReturnAsTable"] = json!(self.return_as_table);
        Ok(ApiCall::post(Endpoint::ReadMemory, body))
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ReadIntegerRequest {
    pub address: String,
    /// Interpret the value as signed.
    #[serde(default)]
    pub signed: bool,
}

impl ReadIntegerRequest {
    pub fn to_call(
        &self,
        kind: ValueKind,
        target: MemoryTarget,
    ) -> Result<ApiCall, RequestValidationError> {
        require_non_blank("address", &self.address)?;
        let mut body = memory_body(&self.address, kind, target);
        body["Signed"] = json!(self.signed);
        Ok(ApiCall::post(Endpoint::ReadMemory, body))
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ReadStringRequest {
    pub address: String,
    /// Maximum number of characters to read (1-65536).
    pub max_length: u32,
    /// Read UTF-16 instead of single-byte characters.
    #[serde(default)]
    pub wide_char: bool,
}

impl ReadStringRequest {
    pub fn to_call(&self, target: MemoryTarget) -> Result<ApiCall, RequestValidationError> {
        require_non_blank("address", &self.address)?;
        require_range(
            "max_length",
            self.max_length.into(),
            1,
            MAX_TRANSFER_LEN.into(),
        )?;
        let mut body = memory_body(&self.address, ValueKind::String, target);
        body["MaxLength"] = json!(self.max_length);
        body["WideChar"] = json!(self.wide_char);
        Ok(ApiCall::post(Endpoint::ReadMemory, body))
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct WriteBytesRequest {
    pub address: String,
    /// Bytes to write, each 0-255.
    pub byte_values: Vec<u8>,
}

impl WriteBytesRequest {
    pub fn to_call(&self, target: MemoryTarget) -> Result<ApiCall, RequestValidationError> {
        require_non_blank("address", &self.address)?;
        if self.byte_values.is_empty() {
            return Err(RequestValidationError::Blank {
                field: "byte_values",
            });
        }
        let mut body = memory_body(&self.address, ValueKind::Bytes, target);
        body["Value"] = json!(self.byte_values);
        Ok(ApiCall::post(Endpoint::WriteMemory, body))
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct WriteIntegerRequest {
    pub address: String,
    pub value: i64,
}

impl WriteIntegerRequest {
    pub fn to_call(
        &self,
        kind: ValueKind,
        target: MemoryTarget,
    ) -> Result<ApiCall, RequestValidationError> {
        require_non_blank("address", &self.address)?;
        let range = match kind {
            ValueKind::SmallInteger => Some(SMALL_INTEGER_RANGE),
            ValueKind::Integer => Some(INTEGER_RANGE),
            _ => None,
        };
        if let Some((min, max)) = range {
            require_range("value", self.value.into(), min, max)?;
        }
        let mut body = memory_body(&self.address, kind, target);
        body["Value"] = json!(self.value);
        Ok(ApiCall::post(Endpoint::WriteMemory, body))
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct WriteFloatRequest {
    pub address: String,
    pub value: f64,
}

impl WriteFloatRequest {
    pub fn to_call(
        &self,
        kind: ValueKind,
        target: MemoryTarget,
    ) -> Result<ApiCall, RequestValidationError> {
        require_non_blank("address", &self.address)?;
        if !self.value.is_finite() {
            return Err(RequestValidationError::NotFinite { field: "value" });
        }
        let mut body = memory_body(&self.address, kind, target);
        body["Value"] = json!(self.value);
        Ok(ApiCall::post(Endpoint::WriteMemory, body))
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct WriteStringRequest {
    pub address: String,
    pub text: String,
    /// Write UTF-16 instead of single-byte characters.
    #[serde(default)]
    pub wide_char: bool,
}

impl WriteStringRequest {
    pub fn to_call(&self, target: MemoryTarget) -> Result<ApiCall, RequestValidationError> {
        require_non_blank("address", &self.address)?;
        let mut body = memory_body(&self.address, ValueKind::String, target);
        body["Value"] = json!(self.text);
        body["WideChar"] = json!(self.wide_char);
        Ok(ApiCall::post(Endpoint::WriteMemory, body))
    }
}

#[tool_router(router = memory_router, vis = "pub(crate)")]
impl CheatEngineServer {
    #[tool(
        name = "read_bytes",
        description = "Read bytes from the opened process"
    )]
    async fn read_bytes(
        &self,
        Parameters(request): Parameters<ReadBytesRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked("read_bytes", request.to_call(Process))
            .await
    }

    #[tool(
        name = "read_bytes_local",
        description = "Read bytes from Cheat Engine's own memory"
    )]
    async fn read_bytes_local(
        &self,
        Parameters(request): Parameters<ReadBytesRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked("read_bytes_local", request.to_call(Local))
            .await
    }

    #[tool(
        name = "read_small_integer",
        description = "Read a 16-bit integer from the opened process"
    )]
    async fn read_small_integer(
        &self,
        Parameters(request): Parameters<ReadIntegerRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked(
            "read_small_integer",
            request.to_call(ValueKind::SmallInteger, Process),
        )
        .await
    }

    #[tool(
        name = "read_small_integer_local",
        description = "Read a 16-bit integer from Cheat Engine's own memory"
    )]
    async fn read_small_integer_local(
        &self,
        Parameters(request): Parameters<AddressRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked(
            "read_small_integer_local",
            read_value_call(&request, ValueKind::SmallInteger, Local),
        )
        .await
    }

    #[tool(
        name = "read_integer",
        description = "Read a 32-bit integer from the opened process"
    )]
    async fn read_integer(
        &self,
        Parameters(request): Parameters<ReadIntegerRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked(
            "read_integer",
            request.to_call(ValueKind::Integer, Process),
        )
        .await
    }

    #[tool(
        name = "read_integer_local",
        description = "Read a 32-bit integer from Cheat Engine's own memory"
    )]
    async fn read_integer_local(
        &self,
        Parameters(request): Parameters<ReadIntegerRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked(
            "read_integer_local",
            request.to_call(ValueKind::Integer, Local),
        )
        .await
    }

    #[tool(
        name = "read_qword",
        description = "Read a 64-bit integer from the opened process"
    )]
    async fn read_qword(
        &self,
        Parameters(request): Parameters<AddressRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked(
            "read_qword",
            read_value_call(&request, ValueKind::Qword, Process),
        )
        .await
    }

    #[tool(
        name = "read_qword_local",
        description = "Read a 64-bit integer from Cheat Engine's own memory"
    )]
    async fn read_qword_local(
        &self,
        Parameters(request): Parameters<AddressRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked(
            "read_qword_local",
            read_value_call(&request, ValueKind::Qword, Local),
        )
        .await
    }

    #[tool(
        name = "read_pointer",
        description = "Read a pointer-sized integer from the opened process"
    )]
    async fn read_pointer(
        &self,
        Parameters(request): Parameters<AddressRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked(
            "read_pointer",
            read_value_call(&request, ValueKind::Pointer, Process),
        )
        .await
    }

    #[tool(
        name = "read_pointer_local",
        description = "Read a pointer-sized integer from Cheat Engine's own memory"
    )]
    async fn read_pointer_local(
        &self,
        Parameters(request): Parameters<AddressRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked(
            "read_pointer_local",
            read_value_call(&request, ValueKind::Pointer, Local),
        )
        .await
    }

    #[tool(
        name = "read_float",
        description = "Read a 32-bit float from the opened process"
    )]
    async fn read_float(
        &self,
        Parameters(request): Parameters<AddressRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked(
            "read_float",
            read_value_call(&request, ValueKind::Float, Process),
        )
        .await
    }

    #[tool(
        name = "read_float_local",
        description = "Read a 32-bit float from Cheat Engine's own memory"
    )]
    async fn read_float_local(
        &self,
        Parameters(request): Parameters<AddressRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked(
            "read_float_local",
            read_value_call(&request, ValueKind::Float, Local),
        )
        .await
    }

    #[tool(
        name = "read_double",
        description = "Read a 64-bit float from the opened process"
    )]
    async fn read_double(
        &self,
        Parameters(request): Parameters<AddressRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked(
            "read_double",
            read_value_call(&request, ValueKind::Double, Process),
        )
        .await
    }

    #[tool(
        name = "read_double_local",
        description = "Read a 64-bit float from Cheat Engine's own memory"
    )]
    async fn read_double_local(
        &self,
        Parameters(request): Parameters<AddressRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked(
            "read_double_local",
            read_value_call(&request, ValueKind::Double, Local),
        )
        .await
    }

    #[tool(
        name = "read_string",
        description = "Read a string from the opened process"
    )]
    async fn read_string(
        &self,
        Parameters(request): Parameters<ReadStringRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked("read_string", request.to_call(Process))
            .await
    }

    #[tool(
        name = "read_string_local",
        description = "Read a string from Cheat Engine's own memory"
    )]
    async fn read_string_local(
        &self,
        Parameters(request): Parameters<ReadStringRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked("read_string_local", request.to_call(Local))
            .await
    }

    #[tool(
        name = "write_bytes",
        description = "Write bytes to the opened process"
    )]
    async fn write_bytes(
        &self,
        Parameters(request): Parameters<WriteBytesRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked("write_bytes", request.to_call(Process))
            .await
    }

    #[tool(
        name = "write_bytes_local",
        description = "Write bytes to Cheat Engine's own memory"
    )]
    async fn write_bytes_local(
        &self,
        Parameters(request): Parameters<WriteBytesRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked("write_bytes_local", request.to_call(Local))
            .await
    }

    #[tool(
        name = "write_small_integer",
        description = "Write a 16-bit integer to the opened process"
    )]
    async fn write_small_integer(
        &self,
        Parameters(request): Parameters<WriteIntegerRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked(
            "write_small_integer",
            request.to_call(ValueKind::SmallInteger, Process),
        )
        .await
    }

    #[tool(
        name = "write_small_integer_local",
        description = "Write a 16-bit integer to Cheat Engine's own memory"
    )]
    async fn write_small_integer_local(
        &self,
        Parameters(request): Parameters<WriteIntegerRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked(
            "write_small_integer_local",
            request.to_call(ValueKind::SmallInteger, Local),
        )
        .await
    }

    #[tool(
        name = "write_integer",
        description = "Write a 32-bit integer to the opened process"
    )]
    async fn write_integer(
        &self,
        Parameters(request): Parameters<WriteIntegerRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked(
            "write_integer",
            request.to_call(ValueKind::Integer, Process),
        )
        .await
    }

    #[tool(
        name = "write_integer_local",
        description = "Write a 32-bit integer to Cheat Engine's own memory"
    )]
    async fn write_integer_local(
        &self,
        Parameters(request): Parameters<WriteIntegerRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked(
            "write_integer_local",
            request.to_call(ValueKind::Integer, Local),
        )
        .await
    }

    #[tool(
        name = "write_qword",
        description = "Write a 64-bit integer to the opened process"
    )]
    async fn write_qword(
        &self,
        Parameters(request): Parameters<WriteIntegerRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked(
            "write_qword",
            request.to_call(ValueKind::Qword, Process),
        )
        .await
    }

    #[tool(
        name = "write_qword_local",
        description = "Write a 64-bit integer to Cheat Engine's own memory"
    )]
    async fn write_qword_local(
        &self,
        Parameters(request): Parameters<WriteIntegerRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked(
            "write_qword_local",
            request.to_call(ValueKind::Qword, Local),
        )
        .await
    }

    #[tool(
        name = "write_float",
        description = "Write a 32-bit float to the opened process"
    )]
    async fn write_float(
        &self,
        Parameters(request): Parameters<WriteFloatRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked(
            "write_float",
            request.to_call(ValueKind::Float, Process),
        )
        .await
    }

    #[tool(
        name = "write_float_local",
        description = "Write a 32-bit float to Cheat Engine's own memory"
    )]
    async fn write_float_local(
        &self,
        Parameters(request): Parameters<WriteFloatRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked(
            "write_float_local",
            request.to_call(ValueKind::Float, Local),
        )
        .await
    }

    #[tool(
        name = "write_double",
        description = "Write a 64-bit float to the opened process"
    )]
    async fn write_double(
        &self,
        Parameters(request): Parameters<WriteFloatRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked(
            "write_double",
            request.to_call(ValueKind::Double, Process),
        )
        .await
    }

    #[tool(
        name = "write_double_local",
        description = "Write a 64-bit float to Cheat Engine's own memory"
    )]
    async fn write_double_local(
        &self,
        Parameters(request): Parameters<WriteFloatRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked(
            "write_double_local",
            request.to_call(ValueKind::Double, Local),
        )
        .await
    }

    #[tool(
        name = "write_string",
        description = "Write a string to the opened process"
    )]
    async fn write_string(
        &self,
        Parameters(request): Parameters<WriteStringRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked("write_string", request.to_call(Process))
            .await
    }

    #[tool(
        name = "write_string_local",
        description = "Write a string to Cheat Engine's own memory"
    )]
    async fn write_string_local(
        &self,
        Parameters(request): Parameters<WriteStringRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        self.forward_checked("write_string_local", request.to_call(Local))
            .await
    }
}
