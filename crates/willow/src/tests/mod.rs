mod paste;
