fn main() {
    #[cfg(feature = "csr")]
    bchat_web::mount();
}
