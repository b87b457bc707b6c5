//! # Regedit CLI
//!
//! The binary is intentionally thin: the CLI lives in `cli/`, while this file only
//! invokes `cli::run()` and handles process termination.
//!
//! ```text
//! regedit list HKLM\Software\Foo            # list subkeys and values
//! regedit list --arch 64 HKLM\Software\Foo  # pinned to the 64bit view
//! regedit create-key HKCU\Software\Foo
//! regedit delete-key HKCU\Software\Foo
//! regedit put-value HKCU\Software\Foo Name value --type REG_SZ
//! regedit put-value --file values.json
//! regedit --dry-run list HKLM\Software      # print the command line only
//! ```

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
