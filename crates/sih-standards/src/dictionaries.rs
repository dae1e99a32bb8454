//! Static dictionaries for the coded SIH fields.

use sih_model::{LookupTable, LookupTables};

/// Discharge or stay motive (`COBRANCA`).
pub const DISCHARGE_MOTIVES: &[(&str, &str)] = &[
    ("11", "Alta curado"),
    ("12", "Alta melhorado"),
    ("13", "Alta da mãe/puérpera e permanência recém-nascido"),
    ("14", "Alta a pedido"),
    ("15", "Alta com previsão de retorno p/acomp do paciente"),
    ("16", "Alta por evasão"),
    ("17", "Alta da mãe/puérpera e do recém-nascido"),
    ("18", "Alta por outros motivos"),
    ("19", "Alta de paciente agudo em psiquiatria"),
    ("21", "Permanência por características próprias da doença"),
    ("22", "Permanência por intercorrência"),
    ("23", "Permanência por impossibilidade sócio-familiar"),
    ("24", "Permanência proc doação órg, tec, cél-doador vivo"),
    ("25", "Permanência proc doação órg, tec, cél-doador morto"),
    ("26", "Permanência por mudança de procedimento"),
    ("27", "Permanência por reoperação"),
    ("28", "Permanência por outros motivos"),
    ("29", "Transferência para internação domiciliar"),
    ("31", "Transferência para outro estabelecimento"),
    ("32", "Transferência para internação domiciliar"),
    ("41", "Óbito com DO fornecida pelo médico assistente"),
    ("42", "Óbito com DO fornecida pelo IML"),
    ("43", "Óbito com DO fornecida pelo SVO"),
    ("51", "Encerramento administrativo"),
    ("61", "Alta da mãe/puérpera e do recém-nascido"),
    ("62", "Alta da mãe/puérpera e permanência recém-nascido"),
    ("63", "Alta da mãe/puérpera e óbito do recém-nascido"),
    ("64", "Alta da mãe/puérpera com óbito fetal"),
    ("65", "Óbito da gestante e do concepto"),
    ("66", "Óbito da mãe/puérpera e alta do recém-nascido"),
    ("67", "Óbito da mãe/puérpera e permanência recém-nascido"),
];

/// Race/colour (`RACA_COR`).
pub const RACES: &[(&str, &str)] = &[
    ("1", "Branca"),
    ("2", "Preta"),
    ("3", "Parda"),
    ("4", "Amarela"),
    ("5", "Indígena"),
    ("99", "Sem Informação"),
];

/// Education level (`INSTRU`). Codes 0 and 9 carry no information and map
/// to an empty label.
pub const EDUCATION_LEVELS: &[(&str, &str)] = &[
    ("0", ""),
    ("1", "Analfabeto"),
    ("2", "1º grau"),
    ("3", "2º grau"),
    ("4", "3º grau"),
    ("9", ""),
];

pub fn discharge_motive_table() -> LookupTable {
    LookupTable::from_pairs("motivo_saida", DISCHARGE_MOTIVES.iter().copied())
}

pub fn race_table() -> LookupTable {
    LookupTable::from_pairs("raca_cor", RACES.iter().copied())
}

pub fn education_table() -> LookupTable {
    LookupTable::from_pairs("nivel_ensino", EDUCATION_LEVELS.iter().copied())
}

/// The static dictionaries, without a diagnosis table.
pub fn static_lookup_tables() -> LookupTables {
    LookupTables::new(discharge_motive_table(), race_table(), education_table())
}

#[cfg(test)]
mod tests {
    use sih_model::LookupKind;

    use super::*;

    #[test]
    fn test_discharge_motives() {
        let table = discharge_motive_table();
        assert_eq!(table.len(), 31);
        assert_eq!(table.lookup("11"), Some("Alta curado"));
        assert_eq!(table.lookup_code(11), Some("Alta curado"));
        assert_eq!(table.lookup("999"), None);
        assert_eq!(table.lookup_code(29), table.lookup_code(32));
    }

    #[test]
    fn test_race_and_education() {
        let tables = static_lookup_tables();
        let race = tables.get(LookupKind::Race).unwrap();
        assert_eq!(race.lookup("05"), Some("Indígena"));
        assert_eq!(race.lookup("99"), Some("Sem Informação"));
        let education = tables.get(LookupKind::Education).unwrap();
        assert_eq!(education.lookup("1"), Some("Analfabeto"));
        assert_eq!(education.lookup("9"), Some(""));
        assert!(tables.get(LookupKind::Diagnosis).is_none());
    }
}
