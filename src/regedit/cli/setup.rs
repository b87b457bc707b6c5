use clap::{Parser, Subcommand};
use regedit::model::{Arch, ValueType};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "regedit", bin_name = "regedit", version)]
#[command(about = "Read and write the Windows registry through script files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print the command line instead of running it
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Directory holding config.json (defaults to the user config dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List subkeys and values of one or more keys
    #[command(alias = "ls")]
    List {
        /// Key paths (e.g. HKLM\Software\Foo)
        #[arg(required = true, num_args = 1..)]
        keys: Vec<String>,

        /// Registry view: A (agnostic), S (specific), 32 or 64
        #[arg(short, long, default_value = "A")]
        arch: Arch,
    },

    /// Create one or more keys
    CreateKey {
        /// Key paths to create
        #[arg(required = true, num_args = 1..)]
        keys: Vec<String>,
    },

    /// Delete one or more keys
    #[command(alias = "rm")]
    DeleteKey {
        /// Key paths to delete
        #[arg(required = true, num_args = 1..)]
        keys: Vec<String>,
    },

    /// Write a value, or every value of a JSON value map
    PutValue {
        /// Key path holding the value
        #[arg(required_unless_present = "file")]
        key: Option<String>,

        /// Value name
        #[arg(required_unless_present = "file")]
        name: Option<String>,

        /// Value data; binary and multi-string data is comma separated
        #[arg(required_unless_present = "file")]
        value: Option<String>,

        /// Registry value type
        #[arg(short = 't', long = "type", default_value = "REG_SZ")]
        kind: ValueType,

        /// JSON file of the form {"<key>": {"<name>": {"value": ..., "type": ...}}}
        #[arg(short, long, conflicts_with_all = ["key", "name", "value"])]
        file: Option<PathBuf>,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (interpreter, interpreter-flags, script-dir)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}
