mod prefixes;
