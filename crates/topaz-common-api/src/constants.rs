//! Flag spellings understood by the Topaz Workbench CLI.
//!
//! These are a compatibility contract with the external tool and must not
//! change.

pub const HOST_PARM: &str = "-host";
pub const PORT_PARM: &str = "-port";
pub const PROTOCOL_PARM: &str = "-protocol";
pub const CODE_PAGE_PARM: &str = "-code";
pub const TIMEOUT_PARM: &str = "-timeout";
pub const USERID_PARM: &str = "-id";
pub const PW_PARM: &str = "-pass";
pub const CERT_PARM: &str = "-certificate";
pub const DATA_PARM: &str = "-data";
pub const TARGET_FOLDER_PARM: &str = "-targetFolder";

pub const TOPAZ_CLI_WORKSPACE: &str = "TopazCliWkspc";
pub const VERSION_FILE: &str = "version.xml";

/// Minimum CLI version accepting `-protocol`.
pub const HOST_CONNECTION_PROTOCOL_MINIMUM_VERSION: &str = "19.4.1";

pub const DASH: &str = "-";
pub const DOUBLE_QUOTE: &str = "\"";
pub const DOUBLE_QUOTE_ESCAPED: &str = "\"\"";
