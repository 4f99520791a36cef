#![allow(dead_code)]

use std::{
    fs, io,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
};

pub const FRQX_HEADER: &str =
    "CHR\tSNP\tA1\tA2\tC(HOM A1)\tC(HET)\tC(HOM A2)\tC(HAP A1)\tC(HAP A2)\tC(MISSING)";

/// Sites in the fake frequency table, with their heterozygous and homozygous derived counts.
pub const SITES: &[(&str, &str, &str)] = &[
    ("rs1", "0", "1"),
    ("rs2", "0", "0"),
    ("rs3", "1", "0"),
    ("rs4", "0", "1"),
    ("rs5", "1", "0"),
    ("rs6", "0", "0"),
];

pub fn homozygous_sites() -> Vec<&'static str> {
    SITES
        .iter()
        .filter(|(_, _, hom)| *hom == "1")
        .map(|(site, _, _)| *site)
        .collect()
}

pub fn heterozygous_sites() -> Vec<&'static str> {
    SITES
        .iter()
        .filter(|(_, het, _)| *het == "1")
        .map(|(site, _, _)| *site)
        .collect()
}

fn write_executable(path: &Path, contents: &str) -> io::Result<()> {
    fs::write(path, contents)?;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

/// Writes a script standing in for plink.
///
/// The script writes the frequency table to `<out>.frqx` along with empty log and nosex
/// files, and records its arguments in `<out>.args`.
pub fn fake_plink(dir: &Path) -> io::Result<PathBuf> {
    let mut table = String::from(FRQX_HEADER);
    for (site, het, hom) in SITES {
        table.push_str(&format!("\n1\t{site}\tA\tG\t0\t{het}\t{hom}\t0\t0\t0"));
    }

    let script = format!(
        r#"#!/bin/sh
args="$*"
while [ $# -gt 0 ]; do
    case "$1" in
        --out) out="$2"; shift ;;
        --keep) keep="$2"; shift ;;
    esac
    shift
done
test -f "$keep" || exit 4
echo "$args" > "$out.args"
cat > "$out.frqx" <<'TABLE'
{table}
TABLE
: > "$out.log"
: > "$out.nosex"
echo "plink output"
"#
    );

    let path = dir.join("fake-plink");
    write_executable(&path, &script)?;
    Ok(path)
}

/// Writes a script standing in for plink which fails without writing anything.
pub fn failing_plink(dir: &Path) -> io::Result<PathBuf> {
    let path = dir.join("failing-plink");
    write_executable(&path, "#!/bin/sh\nexit 3\n")?;
    Ok(path)
}

/// Writes a script standing in for the simulation engine.
///
/// The script copies its stdin to `<output>.json` and writes a VCF header with the given
/// sample names to `<output>`.
pub fn fake_engine(dir: &Path, samples: &[String]) -> io::Result<PathBuf> {
    let header = format!(
        "##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\t{}",
        samples.join("\t")
    );

    let script = format!(
        r#"#!/bin/sh
cat > "$1.json"
cat > "$1" <<'HEADER'
{header}
HEADER
"#
    );

    let path = dir.join("fake-engine");
    write_executable(&path, &script)?;
    Ok(path)
}

/// Writes a script standing in for the simulation engine which reads the request and exits
/// successfully without writing any output.
pub fn silent_engine(dir: &Path) -> io::Result<PathBuf> {
    let path = dir.join("silent-engine");
    write_executable(&path, "#!/bin/sh\ncat > /dev/null\n")?;
    Ok(path)
}
