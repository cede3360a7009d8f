use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn mdnize_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("mdnize"));
	cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
	cmd
}

/// A project with one documented source file and a README holding the
/// default placeholder.
pub fn sample_project() -> std::io::Result<tempfile::TempDir> {
	let tmp = tempfile::tempdir()?;
	std::fs::create_dir_all(tmp.path().join("src"))?;
	std::fs::write(
		tmp.path().join("src/a.js"),
		"// md:[js]\nconsole.log(\"hi\");\n// :md\n",
	)?;
	std::fs::write(
		tmp.path().join("README.md"),
		"# Project\n\n<!-- mdnize: -->\n<!-- :mdnize -->\n",
	)?;
	Ok(tmp)
}
