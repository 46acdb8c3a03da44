//! Profile flow over a semicolon-delimited fixture.

use std::fs;

use brinvest_runner::{run_profile_flow, PipelineConfig};

const PROFILE_CSV: &str = "\
Estado Civil;Genero;Profissao;UF do Investidor;Idade
casado(a);M;ENGENHEIRO;sp;39
solteiro(a);F;medico;RJ;28
casado(a);m;professor;SP;51
divorciado(a);F;ENGENHEIRO;mg;44;extra
";

fn config_in(dir: &std::path::Path) -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.inputs.market = dir.join("mercado.csv");
    config.inputs.profile = dir.join("perfil.csv");
    config.outputs.dir = dir.join("output");
    config.style.dpi = 40;
    config
}

#[test]
fn profile_flow_writes_dashboard() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    fs::write(&config.inputs.profile, PROFILE_CSV).unwrap();
    fs::create_dir_all(&config.outputs.dir).unwrap();

    let report = run_profile_flow(&config);
    assert!(!report.is_skipped());
    assert!(report.failures.is_empty(), "{:?}", report.failures);
    assert_eq!(report.artifacts, vec![config.outputs.profile_dashboard_path()]);
    assert!(config.outputs.profile_dashboard_path().exists());
}

#[test]
fn all_malformed_lines_skip_the_flow() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    fs::write(&config.inputs.profile, "Genero;Idade\nM;1;x\nF;2;y\n").unwrap();
    fs::create_dir_all(&config.outputs.dir).unwrap();

    let report = run_profile_flow(&config);
    assert!(report.is_skipped());
    assert!(report.artifacts.is_empty());
    assert!(!config.outputs.profile_dashboard_path().exists());
}
