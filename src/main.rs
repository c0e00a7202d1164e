// ── Safety policy ────────────────────────────────────────────────────────────
// The probe is safe code only; every OS call goes through the `k32` library.
#![forbid(unsafe_code)]

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Query kernel32 from the command line.
#[derive(Debug, Parser)]
#[command(name = "k32probe", version, about)]
struct Cli {
    /// Print machine-readable JSON where the command supports it.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Memory status (text report, or MEMORYSTATUSEX with --json).
    Memory,
    /// Processor and address-space information.
    System,
    /// OS version as reported to this executable.
    Version,
    /// Installed (default) or supported locale identifiers.
    Locales {
        #[arg(long)]
        supported: bool,
    },
    /// Full path of this executable.
    Exe,
    /// Directory containing this executable.
    ModuleDir,
    /// Free and total space of a volume, e.g. `C:\`.
    Disk { root: String },
    /// Entries matching a search pattern, e.g. `C:\Windows\*.exe`.
    Find { pattern: String },
    /// System text for an error code (decimal or 0x-prefixed hex).
    Error {
        #[arg(value_parser = parse_code)]
        code: u32,
    },
}

fn parse_code(s: &str) -> std::result::Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid error code {s:?}: {e}"))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("k32probe: {e:#}");
        std::process::exit(1);
    }
}

#[cfg(not(windows))]
fn run(cli: &Cli) -> Result<()> {
    log::debug!("{:?}", cli.command);
    anyhow::bail!("kernel32 is only available on Windows")
}

#[cfg(windows)]
fn run(cli: &Cli) -> Result<()> {
    use anyhow::Context;
    use k32::{
        consts::{LCID_INSTALLED, LCID_SUPPORTED},
        platform::win32::{fs, process, sysinfo},
    };

    match &cli.command {
        Command::Memory if cli.json => {
            let ms = sysinfo::global_memory_status_ex().context("querying memory status")?;
            print_json(&ms)
        }
        Command::Memory => {
            println!("{}", sysinfo::memory_info());
            Ok(())
        }
        Command::System => {
            let summary = sysinfo::system_info().summary();
            if cli.json {
                return print_json(&summary);
            }
            println!("processors:   {}", summary.number_of_processors);
            println!("architecture: {}", summary.processor_architecture);
            println!("page size:    {}", summary.page_size);
            println!("granularity:  {}", summary.allocation_granularity);
            println!(
                "addresses:    {:#x}..{:#x}",
                summary.minimum_application_address, summary.maximum_application_address
            );
            Ok(())
        }
        Command::Version => {
            let v = sysinfo::version_ex().context("querying OS version")?.summary();
            if cli.json {
                return print_json(&v);
            }
            println!("{}.{}.{} {}", v.major, v.minor, v.build, v.service_pack);
            Ok(())
        }
        Command::Locales { supported } => {
            let flag = if *supported { LCID_SUPPORTED } else { LCID_INSTALLED };
            let locales = sysinfo::enum_locales(flag).context("enumerating locales")?;
            if cli.json {
                return print_json(&locales);
            }
            for id in locales {
                println!("{id}");
            }
            Ok(())
        }
        Command::Exe => {
            let path = sysinfo::try_application_file_name().context("reading executable path")?;
            println!("{}", path.display());
            Ok(())
        }
        Command::ModuleDir => {
            println!("{}", sysinfo::module_directory(None));
            Ok(())
        }
        Command::Disk { root } => {
            let root = std::path::Path::new(root);
            let space = fs::disk_free_space_ex(Some(root))
                .with_context(|| format!("querying free space of {}", root.display()))?;
            if cli.json {
                return print_json(&space);
            }
            println!("available: {}", space.free_bytes_available);
            println!("free:      {}", space.total_number_of_free_bytes);
            println!("total:     {}", space.total_number_of_bytes);
            Ok(())
        }
        Command::Find { pattern } => {
            let mut entries = Vec::new();
            for entry in fs::find_files(pattern).with_context(|| format!("searching {pattern}"))? {
                let entry = entry.with_context(|| format!("searching {pattern}"))?;
                if !entry.is_dot_entry() {
                    entries.push(entry.entry());
                }
            }
            if cli.json {
                return print_json(&entries);
            }
            for e in entries {
                let kind = if e.attributes & k32::flags::FileAttributes::DIRECTORY.bits() != 0 { "<DIR>" } else { "" };
                println!("{:>5} {:>12} {}", kind, e.size, e.name);
            }
            Ok(())
        }
        Command::Error { code } => {
            let text = process::format_message(*code).with_context(|| format!("no system message for {code}"))?;
            println!("{text}");
            Ok(())
        }
    }
}

#[cfg(windows)]
fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
