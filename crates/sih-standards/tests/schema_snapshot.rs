use sih_standards::sih_schema;

#[test]
fn canonical_schema_listing_is_stable() {
    let schema = sih_schema().expect("canonical schema");
    let listing: Vec<String> = schema
        .fields()
        .iter()
        .map(|field| format!("{:<10} {:<9} {}", field.name, field.role, field.target))
        .collect();
    insta::assert_snapshot!(listing.join("\n"), @r"
    VAL_SH     metric    currency
    VAL_SP     metric    currency
    VAL_TOT    metric    currency
    VAL_UTI    metric    currency
    VAL_UCI    metric    currency
    VAL_VALATO metric    currency
    DIAS_PERM  metric    integer
    TEMP_PERM  metric    text
    MORTE      metric    integer
    SP_QT_PROC metric    integer
    DT_INTER   dimension date
    DT_SAIDA   dimension date
    CNES       dimension text
    COBRANCA   dimension coded (discharge motive)
    SEQ_AIH5   dimension text
    SP_NAIH    dimension text
    SP_CNES    dimension text
    SP_UF      dimension text
    SP_AA      dimension text
    SP_MM      dimension text
    SP_DTINTER dimension date
    SP_DTSAIDA dimension date
    SP_GESTOR  dimension text
    SP_U_AIH   dimension text
    DIAG_PRINC dimension coded (diagnosis)
    CID_ASSO   dimension text
    CID_MORTE  dimension text
    CID_NOTIF  dimension text
    SP_PROCREA dimension text
    IDADE      dimension integer
    INSTRU     dimension coded (education)
    RACA_COR   dimension coded (race)
    ETNIA      dimension text
    SP_M_HOSP  dimension text
    ");
}
