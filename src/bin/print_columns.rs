// Small dev utility: show the header row of a commercialization CSV under each delimiter.
//
// Usage:
//   cargo run --bin print_columns -- [csv_path]
//
// Without a path, reads comercializacao_filtrada.csv from VITIBRASIL_DATA_DIR (default ".").

use vitibrasil_analysis::config::analysis_config::COMMERCIALIZATION_FILES;
use vitibrasil_analysis::importer::read_header;
use vitibrasil_analysis::ConfigManager;

const DELIMITERS: [u8; 3] = [b';', b',', b'\t'];

fn main() -> anyhow::Result<()> {
    let path = match std::env::args()
        .nth(1)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
    {
        Some(p) => std::path::PathBuf::from(p),
        None => ConfigManager::from_env()
            .get_data_dir()
            .join(COMMERCIALIZATION_FILES[0]),
    };

    for delimiter in DELIMITERS {
        let label = (delimiter as char).escape_default().to_string();
        match read_header(&path, delimiter) {
            Ok(columns) => {
                println!("sep={} -> {:?}", label, columns);
                break;
            }
            Err(e) => println!("sep={} failed: {}", label, e),
        }
    }
    Ok(())
}
