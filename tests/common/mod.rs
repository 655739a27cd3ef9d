#![allow(dead_code)]

use std::{
    fs,
    path::Path,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use medsafe::{
    context::AppContext,
    data::{dictionary::NameIndex, interactions::InteractionDataset},
    explain::RiskExplainer,
    model::{Classifier, ModelError, ModelResult, MultiLabelEncoder},
};
use ndarray::Array2;
use tempfile::TempDir;

pub const DICTIONARY: &str = "\
DrugBank ID,Name,SMILES
DB00682,Warfarin,CC(=O)CC(C1=CC=CC=C1)C1=C(O)C2=CC=CC=C2OC1=O
DB00945,Aspirin,CC(=O)OC1=CC=CC=C1C(O)=O
DB01118,Amiodarone,CCCCC1=C(C2=CC=CC=C2O1)C(=O)C1=CC(I)=C(OCCN(CC)CC)C(I)=C1
DB00390,Digoxin,
DB00001,Lepirudin,
DB11050,Tiopronin,
";

pub const POSITIVE: &str = "\
DrugBankID,hyperedge_label,time
\"['DB00682', 'DB00945']\",1,2019
\"['DB01118', 'DB00390']\",1,2020
\"['DB00682', 'DB11050']\",1,2021
";

pub const NEGATIVE: &str = "\
DrugBankID,hyperedge_label,time
\"['DB00945', 'DB00390']\",-1,2019
\"['DB01118', 'DB00945']\",-1,2020
\"['DB00390']\",0,2021
";

/// Lay out the reference tables the way `Settings::with_roots` expects.
pub fn write_tables(data_dir: &Path) {
    let dict_dir = data_dir.join("dictionary");
    let merged_dir = data_dir.join("Merged_Dataset");
    fs::create_dir_all(&dict_dir).unwrap();
    fs::create_dir_all(&merged_dir).unwrap();
    fs::write(
        dict_dir.join("Drugbank_ID_SMILE_all_structure links.csv"),
        DICTIONARY,
    )
    .unwrap();
    fs::write(merged_dir.join("pos.csv"), POSITIVE).unwrap();
    fs::write(merged_dir.join("neg.csv"), NEGATIVE).unwrap();
}

pub fn fixture_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_tables(dir.path());
    dir
}

pub fn load_dataset(data_dir: &Path, seed: u64) -> InteractionDataset {
    InteractionDataset::load(
        &data_dir.join("Merged_Dataset/pos.csv"),
        &data_dir.join("Merged_Dataset/neg.csv"),
        seed,
    )
    .unwrap()
}

pub fn load_index(data_dir: &Path, dataset: &InteractionDataset) -> NameIndex {
    let records = medsafe::data::dictionary::read_dictionary(
        &data_dir.join("dictionary/Drugbank_ID_SMILE_all_structure links.csv"),
    )
    .unwrap();
    NameIndex::build(records, &dataset.identifiers()).unwrap()
}

/// Classifier returning a canned answer and counting its invocations.
pub struct StubClassifier {
    pub label: usize,
    pub proba: [f64; 2],
    pub fail: bool,
    pub width: Option<usize>,
    pub calls: AtomicUsize,
}

impl StubClassifier {
    pub fn answering(label: usize, proba: [f64; 2]) -> Self {
        Self {
            label,
            proba,
            fail: false,
            width: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::answering(0, [1.0, 0.0])
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Classifier for StubClassifier {
    fn n_features(&self) -> Option<usize> {
        self.width
    }

    fn predict(&self, features: &Array2<f64>) -> ModelResult<Vec<usize>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ModelError::EmptyInput);
        }
        Ok(vec![self.label; features.nrows()])
    }

    fn predict_proba(&self, features: &Array2<f64>) -> ModelResult<Array2<f64>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ModelError::EmptyInput);
        }
        let mut out = Array2::zeros((features.nrows(), 2));
        for mut row in out.rows_mut() {
            row[0] = self.proba[0];
            row[1] = self.proba[1];
        }
        Ok(out)
    }
}

/// Context over the fixture tables with an encoder fitted on the dataset.
pub fn context_with(data_dir: &Path, classifier: Arc<dyn Classifier>) -> Arc<AppContext> {
    let dataset = load_dataset(data_dir, 42);
    let index = load_index(data_dir, &dataset);
    let encoder = MultiLabelEncoder::fit(
        dataset
            .records()
            .iter()
            .map(|r| r.drug_identifiers.clone()),
    );
    Arc::new(AppContext::new(
        index,
        encoder,
        classifier,
        RiskExplainer::default(),
    ))
}
