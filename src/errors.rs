use thiserror::Error;

#[derive(Debug, Error)]
pub enum WmError {
    #[error(transparent)]
    X11(#[from] X11Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("another window manager is already running")]
    OtherWmRunning,
}

#[derive(Debug, Error)]
pub enum X11Error {
    #[error(transparent)]
    ConnectError(#[from] x11rb::errors::ConnectError),
    #[error(transparent)]
    ConnectionError(#[from] x11rb::errors::ConnectionError),
    #[error(transparent)]
    ReplyError(#[from] x11rb::errors::ReplyError),
    #[error(transparent)]
    ReplyOrIdError(#[from] x11rb::errors::ReplyOrIdError),
    #[error("failed to load font: {0}")]
    FontLoadFailed(String),
    #[error("X protocol error {error_code} in request {major_opcode}.{minor_opcode}")]
    Protocol {
        error_code: u8,
        major_opcode: u8,
        minor_opcode: u16,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse RON config: {0}")]
    ParseError(#[from] ron::error::SpannedError),
    #[error("Invalid variable name '{0}': must start with $")]
    InvalidVariableName(String),
    #[error("Invalid #DEFINE syntax: '{0}'. Expected: #DEFINE $var_name = value")]
    InvalidDefine(String),
    #[error("Undefined variable '{0}': define it with #DEFINE before use")]
    UndefinedVariable(String),
    #[error("At least one tag is required")]
    NoTags,
    #[error("{0} tags configured, at most 31 are supported")]
    TooManyTags(usize),
    #[error("Rule for tag mask {0:#x} names tags that do not exist")]
    InvalidRuleTags(u32),
    #[error("{0}")]
    ValidationError(String),
}

macro_rules! wm_error_from_x11 {
    ($($source:ty),* $(,)?) => {
        $(
            impl From<$source> for WmError {
                fn from(value: $source) -> Self {
                    Self::X11(value.into())
                }
            }
        )*
    };
}

wm_error_from_x11!(
    x11rb::errors::ConnectError,
    x11rb::errors::ConnectionError,
    x11rb::errors::ReplyError,
    x11rb::errors::ReplyOrIdError,
);

pub type WmResult<T> = Result<T, WmError>;

pub mod request {
    pub const SET_INPUT_FOCUS: u8 = 42;
    pub const POLY_TEXT8: u8 = 74;
    pub const POLY_FILL_RECTANGLE: u8 = 70;
    pub const POLY_SEGMENT: u8 = 66;
    pub const CONFIGURE_WINDOW: u8 = 12;
    pub const GRAB_BUTTON: u8 = 28;
    pub const GRAB_KEY: u8 = 33;
    pub const COPY_AREA: u8 = 62;
}

pub mod code {
    pub const BAD_WINDOW: u8 = 3;
    pub const BAD_MATCH: u8 = 8;
    pub const BAD_DRAWABLE: u8 = 9;
    pub const BAD_ACCESS: u8 = 10;
}

/// Protocol errors that happen routinely when a window disappears between the
/// moment we learn about it and the moment a request for it is processed.
pub fn is_ignorable_protocol_error(error_code: u8, major_opcode: u8) -> bool {
    use code::*;
    use request::*;

    error_code == BAD_WINDOW
        || matches!(
            (major_opcode, error_code),
            (SET_INPUT_FOCUS, BAD_MATCH)
                | (POLY_TEXT8, BAD_DRAWABLE)
                | (POLY_FILL_RECTANGLE, BAD_DRAWABLE)
                | (POLY_SEGMENT, BAD_DRAWABLE)
                | (CONFIGURE_WINDOW, BAD_MATCH)
                | (GRAB_BUTTON, BAD_ACCESS)
                | (GRAB_KEY, BAD_ACCESS)
                | (COPY_AREA, BAD_DRAWABLE)
        )
}
