/*
 * Logging goes out over defmt on the device. On the host (tests and the
 * simulation) the macro evaluates its arguments and drops them, so the
 * library does not need a global logger there. The binary is device-only
 * where it logs and calls defmt directly.
 */

macro_rules! info {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(target_os = "none")]
            ::defmt::info!($s $(, $x)*);
            #[cfg(not(target_os = "none"))]
            let _ = ($( & $x ),*);
        }
    };
}
