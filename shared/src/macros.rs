/// Writes a formatted line to `console`, which can be any [`core::fmt::Write`].
///
/// Console output is best-effort: a sink that refuses the write does not
/// abort the caller.
#[macro_export]
macro_rules! console_println {
    ($console:expr) => {{
        use core::fmt::Write;
        let _ = write!($console, "\n");
    }};
    ($console:expr, $($arg:tt)*) => {{
        use core::fmt::Write;
        let console = &mut $console;
        let _ = write!(console, "{}", format_args!($($arg)*));
        let _ = write!(console, "\n");
    }};
}
