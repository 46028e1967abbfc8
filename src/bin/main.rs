fn main() {
  rune_split::main();
}
