use std::io::Write;

/// Intercept messages using the `log` crate and print them to STDERR. `RUST_LOG` overrides the
/// default filter of "info".
pub fn setup() {
    use env_logger::{Builder, Env};
    Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
