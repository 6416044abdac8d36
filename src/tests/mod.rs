use crate::archive::Persist;
use crate::data_reader::read_columns;
use crate::transformer::{StandardScalerTransformer, Transformer};
use crate::{fit_standard_scalers, ErrorKind, Parameters};
use ndarray::{arr2, Axis};
use std::env::temp_dir;
use std::fs::{remove_file, File};
use std::io::Write;

const CSV: &str = "temperature,load\n1,10\n3,nan\n5,30\n7,40\n9,50\n";

fn get_data_path() -> String {
    let mut dir = temp_dir();
    dir.push("featurizers_scaling.csv");
    dir.to_str().unwrap().to_string()
}

#[test]
fn scales_csv_columns() {
    let _ = env_logger::builder().is_test(true).try_init();
    let path = get_data_path();
    File::create(&path).unwrap().write_all(CSV.as_bytes()).unwrap();
    let data = read_columns(&path).unwrap();
    remove_file(&path).unwrap();

    let params = Parameters {
        batch_size: 2,
        ..Default::default()
    };
    let scalers = fit_standard_scalers(&params, data.view()).unwrap();
    assert_eq!(scalers.len(), 2);

    assert_eq!(scalers[0].mean(), 5.0);
    assert!((scalers[0].deviation() - 8f64.sqrt()).abs() < 1e-12);
    assert_eq!(scalers[1].mean(), 32.5);

    let scaled = scalers[0].execute_view(data.index_axis(Axis(1), 0));
    assert!((scaled[0] + 2f64.sqrt()).abs() < 1e-12);
    assert!(scalers[1].execute(&data[[1, 1]]).is_nan());
}

#[test]
fn scalers_survive_persistence() {
    let data = arr2(&[[1.0, -1.0], [2.0, -2.0], [6.0, -6.0]]);
    let scalers = fit_standard_scalers(&Parameters::default(), data.view()).unwrap();
    for scaler in scalers {
        let restored = StandardScalerTransformer::<f64>::load(&scaler.save().unwrap()).unwrap();
        for value in data.iter() {
            assert_eq!(restored.execute(value), scaler.execute(value));
        }
    }
}

#[test]
fn bounded_training() {
    let data = arr2(&[[1.0], [3.0], [1000.0]]);
    let params = Parameters {
        max_training_items: 2,
        ..Default::default()
    };
    let scalers = fit_standard_scalers(&params, data.view()).unwrap();
    assert_eq!(scalers[0].mean(), 2.0);
    assert_eq!(scalers[0].deviation(), 1.0);
}

#[test]
fn invalid_parameters() {
    let data = arr2(&[[1.0]]);
    let params = Parameters {
        max_training_items: 0,
        ..Default::default()
    };
    let error = fit_standard_scalers(&params, data.view()).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Argument);
}
