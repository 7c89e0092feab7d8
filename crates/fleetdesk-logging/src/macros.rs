//! ---
//! fd_section: "03-persistence-logging"
//! fd_subsection: "module"
//! fd_type: "source"
//! fd_scope: "code"
//! fd_description: "Structured logging adapters and sinks."
//! fd_version: "v0.0.0-prealpha"
//! fd_owner: "tbd"
//! ---

/// Shared expansion for the level-specific macros below.
#[doc(hidden)]
#[macro_export]
macro_rules! __desk_event {
    ($level:expr, $ctx:expr, $($arg:tt)+) => {{
        let ctx = &$ctx;
        tracing::event!(
            $level,
            user = ctx.user.unwrap_or(""),
            role = ctx.role.unwrap_or(""),
            route = ctx.route.unwrap_or(""),
            action = ctx.action.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
}

/// Emit an informational log enriched with session context.
#[macro_export]
macro_rules! desk_info {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__desk_event!(tracing::Level::INFO, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__desk_event!(tracing::Level::INFO, $crate::LogContext::default(), $($arg)+)
    };
}

/// Emit a debug log enriched with session context.
#[macro_export]
macro_rules! desk_debug {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__desk_event!(tracing::Level::DEBUG, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__desk_event!(tracing::Level::DEBUG, $crate::LogContext::default(), $($arg)+)
    };
}

/// Emit a warning enriched with session context.
#[macro_export]
macro_rules! desk_warn {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__desk_event!(tracing::Level::WARN, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__desk_event!(tracing::Level::WARN, $crate::LogContext::default(), $($arg)+)
    };
}

/// Emit an error log enriched with session context.
#[macro_export]
macro_rules! desk_error {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__desk_event!(tracing::Level::ERROR, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__desk_event!(tracing::Level::ERROR, $crate::LogContext::default(), $($arg)+)
    };
}
