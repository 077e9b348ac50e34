fn main() {
    uniffi::generate_scaffolding("src/castlog.udl").unwrap();
}
