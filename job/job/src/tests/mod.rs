mod board_locations;
