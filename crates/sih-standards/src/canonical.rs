//! The canonical SIH field list.

use sih_model::{CanonicalField, CanonicalSchema, FieldRole, LookupKind, TargetType};

use crate::error::Result;

use sih_model::FieldRole::{Dimension, Metric};
use sih_model::TargetType::{Coded, Currency, Date, Integer, Text};

/// Name, description, role and target type of every canonical field, in
/// output order.
pub const SIH_FIELDS: &[(&str, &str, FieldRole, TargetType)] = &[
    // Metrics
    ("VAL_SH", "Valor de Serviços Hospitalares", Metric, Currency),
    ("VAL_SP", "Valor de Serviços Profissionais", Metric, Currency),
    ("VAL_TOT", "Valor Total da AIH", Metric, Currency),
    ("VAL_UTI", "Valor Gasto com UTI", Metric, Currency),
    ("VAL_UCI", "Valor Gasto com UCI", Metric, Currency),
    ("VAL_VALATO", "Valor da AIH no Ato Hospitalar", Metric, Currency),
    ("DIAS_PERM", "Dias de Permanência", Metric, Integer),
    ("TEMP_PERM", "Tempo de Permanência (código de faixa de dias)", Metric, Text),
    ("MORTE", "Indicador de Morte", Metric, Integer),
    ("SP_QT_PROC", "Quantidade de Procedimentos Realizados", Metric, Integer),
    // Time, place, establishment and AIH
    ("DT_INTER", "Data de Internação", Dimension, Date),
    ("DT_SAIDA", "Data de Saída", Dimension, Date),
    ("CNES", "Código CNES do Estabelecimento", Dimension, Text),
    ("COBRANCA", "Motivo de Saída/Permanência", Dimension, Coded(LookupKind::DischargeMotive)),
    ("SEQ_AIH5", "Sequencial da AIH", Dimension, Text),
    ("SP_NAIH", "Número da AIH", Dimension, Text),
    ("SP_CNES", "CNES do Prestador de Serviços", Dimension, Text),
    ("SP_UF", "UF do Prestador de Serviços", Dimension, Text),
    ("SP_AA", "Ano da AIH", Dimension, Text),
    ("SP_MM", "Mês da AIH", Dimension, Text),
    ("SP_DTINTER", "Data de Internação (confirmação)", Dimension, Date),
    ("SP_DTSAIDA", "Data de Saída (confirmação)", Dimension, Date),
    ("SP_GESTOR", "Código do Gestor", Dimension, Text),
    ("SP_U_AIH", "Unidade da AIH", Dimension, Text),
    // Diagnosis and procedure
    ("DIAG_PRINC", "CID Principal", Dimension, Coded(LookupKind::Diagnosis)),
    ("CID_ASSO", "CID Secundário/Associado", Dimension, Text),
    ("CID_MORTE", "CID Causa da Morte", Dimension, Text),
    ("CID_NOTIF", "CID de Notificação", Dimension, Text),
    ("SP_PROCREA", "Código do Procedimento Principal", Dimension, Text),
    // Patient
    ("IDADE", "Idade do Paciente", Dimension, Integer),
    ("INSTRU", "Grau de Instrução do Paciente", Dimension, Coded(LookupKind::Education)),
    ("RACA_COR", "Raça/Cor do Paciente", Dimension, Coded(LookupKind::Race)),
    ("ETNIA", "Etnia do Paciente", Dimension, Text),
    ("SP_M_HOSP", "Código do Motivo da Saída/Permanência", Dimension, Text),
];

/// Builds the canonical SIH schema.
pub fn sih_schema() -> Result<CanonicalSchema> {
    let fields = SIH_FIELDS
        .iter()
        .map(|&(name, description, role, target)| {
            CanonicalField::new(name, description, role, target)
        })
        .collect();
    Ok(CanonicalSchema::new(fields)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_shape() {
        let schema = sih_schema().unwrap();
        assert_eq!(schema.len(), 34);
        assert_eq!(schema.fields()[0].name, "VAL_SH");
        assert_eq!(schema.fields()[33].name, "SP_M_HOSP");
        assert_eq!(schema.fields_with_target(Currency).count(), 6);
        assert_eq!(schema.fields_with_target(Date).count(), 4);
        assert_eq!(schema.fields_with_target(Integer).count(), 4);
        assert_eq!(schema.coded_fields().count(), 4);
        assert_eq!(
            schema.fields().iter().filter(|f| f.role == Metric).count(),
            10
        );
    }

    #[test]
    fn test_coded_fields() {
        let schema = sih_schema().unwrap();
        let coded: Vec<_> = schema
            .coded_fields()
            .map(|(field, kind)| (field.name.as_str(), kind))
            .collect();
        assert_eq!(
            coded,
            vec![
                ("COBRANCA", LookupKind::DischargeMotive),
                ("DIAG_PRINC", LookupKind::Diagnosis),
                ("INSTRU", LookupKind::Education),
                ("RACA_COR", LookupKind::Race),
            ]
        );
    }
}
