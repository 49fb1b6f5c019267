//! Shared helpers for the binary-level tests: jar writing, class-file
//! assembly and running `class-finder` with JSON output.

use serde_json::Value;
use std::path::Path;
use std::process::Command;

pub fn write_jar(path: &Path, entries: &[(&str, &[u8])]) -> anyhow::Result<()> {
    use std::io::Write;
    use zip::write::FileOptions;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    let mut zip = zip::ZipWriter::new(file);
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (name, content) in entries {
        zip.start_file(*name, options)?;
        zip.write_all(content)?;
    }
    zip.finish()?;
    Ok(())
}

fn push_utf8(pool: &mut Vec<Vec<u8>>, s: &str) -> u16 {
    let mut entry = vec![1u8];
    entry.extend_from_slice(&(s.len() as u16).to_be_bytes());
    entry.extend_from_slice(s.as_bytes());
    pool.push(entry);
    pool.len() as u16
}

/// Assembles a class file with the given `(flags, name, descriptor)` methods.
pub fn class_bytes(internal_name: &str, methods: &[(u16, &str, &str)]) -> Vec<u8> {
    let mut pool: Vec<Vec<u8>> = Vec::new();
    let name_index = push_utf8(&mut pool, internal_name);
    let mut class_entry = vec![7u8];
    class_entry.extend_from_slice(&name_index.to_be_bytes());
    pool.push(class_entry);
    let this_class = pool.len() as u16;

    let mut table = Vec::new();
    for (flags, name, descriptor) in methods {
        let n = push_utf8(&mut pool, name);
        let d = push_utf8(&mut pool, descriptor);
        table.extend_from_slice(&flags.to_be_bytes());
        table.extend_from_slice(&n.to_be_bytes());
        table.extend_from_slice(&d.to_be_bytes());
        table.extend_from_slice(&0u16.to_be_bytes());
    }

    let mut out = Vec::new();
    out.extend_from_slice(&0xCAFE_BABEu32.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(&52u16.to_be_bytes());
    out.extend_from_slice(&(pool.len() as u16 + 1).to_be_bytes());
    for entry in &pool {
        out.extend_from_slice(entry);
    }
    out.extend_from_slice(&0x0021u16.to_be_bytes());
    out.extend_from_slice(&this_class.to_be_bytes());
    // super class, interfaces, fields
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(&(methods.len() as u16).to_be_bytes());
    out.extend_from_slice(&table);
    out.extend_from_slice(&0u16.to_be_bytes());
    out
}

pub fn random_class() -> Vec<u8> {
    class_bytes(
        "java/util/Random",
        &[
            (0x0001, "<init>", "()V"),
            (0x0001, "nextInt", "()I"),
            (0x0001, "nextInt", "(II)I"),
            (0x0001, "ints", "(J)Ljava/util/stream/IntStream;"),
        ],
    )
}

pub struct Output {
    pub results: Vec<Value>,
    pub stderr: String,
}

pub fn run(args: &[&str]) -> anyhow::Result<Output> {
    let bin = env!("CARGO_BIN_EXE_class-finder");
    let out = Command::new(bin)
        .args(args)
        .args(["--format", "json"])
        .env_remove("RUST_LOG")
        .env_remove("CLASS_FINDER_PATH")
        .output()?;
    if !out.status.success() {
        return Err(anyhow::anyhow!(
            "command failed: status={:?}, stderr={}",
            out.status.code(),
            String::from_utf8_lossy(&out.stderr)
        ));
    }

    let stdout = String::from_utf8(out.stdout)?;
    let results = stdout
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(serde_json::from_str)
        .collect::<Result<Vec<Value>, _>>()?;
    Ok(Output {
        results,
        stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
    })
}
