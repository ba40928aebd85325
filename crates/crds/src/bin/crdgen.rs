//! Print every supported CRD as a multi-document YAML stream.

fn main() {
    for crd in crds::all_crds() {
        match serde_yaml::to_string(&crd) {
            Ok(yaml) => print!("---\n{}", yaml),
            Err(e) => {
                eprintln!("failed to serialize CRD: {}", e);
                std::process::exit(1);
            }
        }
    }
}
