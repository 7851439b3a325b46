mod predict_tests;
