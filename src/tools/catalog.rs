//! Documented tool list, grouped the same way as README.md, and the REST
//! route each tool forwards to.

use super::cheat_engine::{Endpoint, HttpMethod};

/// A named group of tools.
#[derive(Debug, Clone, Copy)]
pub struct ToolCategory {
    pub name: &'static str,
    pub tools: &'static [&'static str],
}

pub const PROCESS_TOOLS: &[&str] = &[
    "execute_lua",
    "get_process_list",
    "open_process",
    "get_thread_list",
    "get_process_status",
];

pub const MEMORY_TOOLS: &[&str] = &[
    "read_bytes",
    "read_bytes_local",
    "read_small_integer",
    "read_small_integer_local",
    "read_integer",
    "read_integer_local",
    "read_qword",
    "read_qword_local",
    "read_pointer",
    "read_pointer_local",
    "read_float",
    "read_float_local",
    "read_double",
    "read_double_local",
    "read_string",
    "read_string_local",
    "write_bytes",
    "write_bytes_local",
    "write_small_integer",
    "write_small_integer_local",
    "write_integer",
    "write_integer_local",
    "write_qword",
    "write_qword_local",
    "write_float",
    "write_float_local",
    "write_double",
    "write_double_local",
    "write_string",
    "write_string_local",
];

pub const ADDRESS_TOOLS: &[&str] = &[
    "get_address_safe",
    "get_name_from_address",
    "in_module",
    "in_system_module",
];

pub const SCAN_TOOLS: &[&str] = &[
    "ansi_to_utf8",
    "utf8_to_ansi",
    "string_to_md5",
    "aob_scan",
    "disassemble",
    "get_instruction_size",
    "memscan",
    "memscan_reset",
];

pub const UTILITY_TOOLS: &[&str] = &["get_api_info", "get_health"];

pub const ADDRESS_LIST_TOOLS: &[&str] = &[
    "get_address_list",
    "add_address_list_entry",
    "update_address_list_entry",
    "delete_address_list_entry",
    "clear_address_list",
];

pub const CATEGORIES: &[ToolCategory] = &[
    ToolCategory {
        name: "process",
        tools: PROCESS_TOOLS,
    },
    ToolCategory {
        name: "memory",
        tools: MEMORY_TOOLS,
    },
    ToolCategory {
        name: "address",
        tools: ADDRESS_TOOLS,
    },
    ToolCategory {
        name: "scan",
        tools: SCAN_TOOLS,
    },
    ToolCategory {
        name: "utility",
        tools: UTILITY_TOOLS,
    },
    ToolCategory {
        name: "address_list",
        tools: ADDRESS_LIST_TOOLS,
    },
];

/// Where a tool's call goes. `Local` tools are answered without a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolRoute {
    Local,
    Remote(HttpMethod, Endpoint),
}

impl ToolRoute {
    pub const fn method(&self) -> &'static str {
        match self {
            ToolRoute::Local => "local",
            ToolRoute::Remote(method, _) => method.as_str(),
        }
    }

    pub const fn endpoint(&self) -> Option<Endpoint> {
        match self {
            ToolRoute::Local => None,
            ToolRoute::Remote(_, endpoint) => Some(*endpoint),
        }
    }
}

const fn get(endpoint: Endpoint) -> ToolRoute {
    ToolRoute::Remote(HttpMethod::Get, endpoint)
}

const fn post(endpoint: Endpoint) -> ToolRoute {
    ToolRoute::Remote(HttpMethod::Post, endpoint)
}

/// One entry per tool, in catalog order. README.md mirrors these columns.
pub const ROUTES: &[(&str, ToolRoute)] = &[
    ("execute_lua", post(Endpoint::ExecuteLua)),
    ("get_process_list", get(Endpoint::ProcessList)),
    ("open_process", post(Endpoint::OpenProcess)),
    ("get_thread_list", get(Endpoint::ThreadList)),
    ("get_process_status", get(Endpoint::ProcessStatus)),
    ("read_bytes", post(Endpoint::ReadMemory)),
    ("read_bytes_local", post(Endpoint::ReadMemory)),
    ("read_small_integer", post(Endpoint::ReadMemory)),
    ("read_small_integer_local", post(Endpoint::ReadMemory)),
    ("read_integer", post(Endpoint::ReadMemory)),
    ("read_integer_local", post(Endpoint::ReadMemory)),
    ("read_qword", post(Endpoint::ReadMemory)),
    ("read_qword_local", post(Endpoint::ReadMemory)),
    ("read_pointer", post(Endpoint::ReadMemory)),
    ("read_pointer_local", post(Endpoint::ReadMemory)),
    ("read_float", post(Endpoint::ReadMemory)),
    ("read_float_local", post(Endpoint::ReadMemory)),
    ("read_double", post(Endpoint::ReadMemory)),
    ("read_double_local", post(Endpoint::ReadMemory)),
    ("read_string", post(Endpoint::ReadMemory)),
    ("read_string_local", post(Endpoint::ReadMemory)),
    ("write_bytes", post(Endpoint::WriteMemory)),
    ("write_bytes_local", post(Endpoint::WriteMemory)),
    ("write_small_integer", post(Endpoint::WriteMemory)),
    ("write_small_integer_local", post(Endpoint::WriteMemory)),
    ("write_integer", post(Endpoint::WriteMemory)),
    ("write_integer_local", post(Endpoint::WriteMemory)),
    ("write_qword", post(Endpoint::WriteMemory)),
    ("write_qword_local", post(Endpoint::WriteMemory)),
    ("write_float", post(Endpoint::WriteMemory)),
    ("write_float_local", post(Endpoint::WriteMemory)),
    ("write_double", post(Endpoint::WriteMemory)),
    ("write_double_local", post(Endpoint::WriteMemory)),
    ("write_string", post(Endpoint::WriteMemory)),
    ("write_string_local", post(Endpoint::WriteMemory)),
    ("get_address_safe", post(Endpoint::GetAddressSafe)),
    ("get_name_from_address", post(Endpoint::GetNameFromAddress)),
    ("in_module", post(Endpoint::InModule)),
    ("in_system_module", post(Endpoint::InSystemModule)),
    ("ansi_to_utf8", post(Endpoint::Convert)),
    ("utf8_to_ansi", post(Endpoint::Convert)),
    ("string_to_md5", post(Endpoint::Convert)),
    ("aob_scan", post(Endpoint::AobScan)),
    ("disassemble", post(Endpoint::Disassemble)),
    ("get_instruction_size", post(Endpoint::Disassemble)),
    ("memscan", post(Endpoint::MemScan)),
    ("memscan_reset", post(Endpoint::MemScanReset)),
    ("get_api_info", ToolRoute::Local),
    ("get_health", get(Endpoint::Health)),
    ("get_address_list", get(Endpoint::AddressList)),
    ("add_address_list_entry", post(Endpoint::AddressListAdd)),
    ("update_address_list_entry", post(Endpoint::AddressListUpdate)),
    ("delete_address_list_entry", post(Endpoint::AddressListDelete)),
    ("clear_address_list", post(Endpoint::AddressListClear)),
];

pub fn route(tool: &str) -> Option<ToolRoute> {
    ROUTES
        .iter()
        .find(|(name, _)| *name == tool)
        .map(|(_, route)| *route)
}

pub fn find_category(name: &str) -> Option<&'static ToolCategory> {
    let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
    CATEGORIES.iter().find(|category| category.name == normalized)
}

pub fn category_names() -> Vec<&'static str> {
    CATEGORIES.iter().map(|category| category.name).collect()
}

pub fn all_tool_names() -> impl Iterator<Item = &'static str> {
    CATEGORIES
        .iter()
        .flat_map(|category| category.tools.iter().copied())
}

pub fn tool_count() -> usize {
    CATEGORIES.iter().map(|category| category.tools.len()).sum()
}
