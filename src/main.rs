fn main() {
    forth::term::main();
}
